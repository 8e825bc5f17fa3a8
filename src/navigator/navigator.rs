use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use colored::*;
use tracing::{info, warn};

use crate::cache::CacheIndex;
use crate::config::Settings;
use crate::hardware::HardwareProfile;
use crate::hub::{HubClient, HubError};
use crate::progress::spinner;

use super::display::{clear_screen, print_error, print_header, print_notice, result_label};
use super::launcher::AnalyzerLauncher;
use super::menu::{Category, MenuState, Pager, ResultSource, Results, ResultsAction};
use super::prompt::{Answer, Prompter};

pub const FAREWELL: &str = "👋 Exiting...";

/// Interactive discovery loop.
pub struct Navigator {
    settings: Settings,
    hub: HubClient,
    index: Arc<CacheIndex>,
    hardware: HardwareProfile,
    prompt: Prompter,
    pager: Pager,
}

type NavResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// Next state after a registry call, plus the error to show first.
#[derive(Debug)]
struct Step {
    next: MenuState,
    error: Option<HubError>,
}

/// What the free-text prompt asks for.
#[derive(Debug, PartialEq)]
enum QueryStep {
    Search(String),
    Goto(MenuState),
}

/// What the results prompt asks for.
#[derive(Debug, PartialEq)]
enum ResultsStep {
    Analyze(Results, String),
    LoadMore(Results),
    Goto(MenuState),
}

fn query_step(answer: Answer<String>) -> QueryStep {
    match answer {
        Answer::Value(query) if query.is_empty() => QueryStep::Goto(MenuState::CategorySelect),
        Answer::Value(query) => QueryStep::Search(query),
        Answer::Cancelled => QueryStep::Goto(MenuState::CategorySelect),
        Answer::Interrupted => QueryStep::Goto(MenuState::Exit),
    }
}

fn results_step(results: Results, answer: Answer<usize>) -> ResultsStep {
    let index = match answer {
        Answer::Value(i) => i,
        Answer::Cancelled => return ResultsStep::Goto(MenuState::CategorySelect),
        Answer::Interrupted => return ResultsStep::Goto(MenuState::Exit),
    };
    match results.action_at(index) {
        ResultsAction::Analyze(repo_id) => ResultsStep::Analyze(results, repo_id),
        ResultsAction::LoadMore => ResultsStep::LoadMore(results),
        ResultsAction::Back => ResultsStep::Goto(MenuState::CategorySelect),
    }
}

/// The analyzer always hands back the list it was started from.
fn after_analyzer(results: Results, pause: Answer<()>) -> MenuState {
    match pause {
        Answer::Interrupted => MenuState::Exit,
        Answer::Value(()) | Answer::Cancelled => MenuState::ResultsList(results),
    }
}

async fn fetch_ids(hub: &HubClient, term: &str, limit: usize) -> Result<Vec<String>, HubError> {
    let pb = spinner(format!("🌐 Searching '{}' (top {})...", term, limit));
    let result = hub.search_models(term, limit).await;
    pb.finish_and_clear();
    result
}

/// First page of a search. Errors lead back to the category menu.
async fn search_step(hub: &HubClient, pager: &Pager, category: Category, term: String) -> Step {
    match fetch_ids(hub, &term, pager.limit()).await {
        Ok(ids) => Step {
            next: MenuState::ResultsList(Results {
                category,
                source: ResultSource::Search { term },
                ids,
            }),
            error: None,
        },
        Err(e) => Step { next: MenuState::CategorySelect, error: Some(e) },
    }
}

/// Re-runs the search with a larger limit. The limit is committed only on
/// success; on failure the current list stays.
async fn load_more_step(hub: &HubClient, pager: &mut Pager, results: Results) -> Step {
    let term = match &results.source {
        ResultSource::Search { term } => term.clone(),
        ResultSource::LocalCache => return Step { next: MenuState::ResultsList(results), error: None },
    };
    let next = pager.next_limit();
    match fetch_ids(hub, &term, next).await {
        Ok(ids) => {
            pager.commit(next);
            Step { next: MenuState::ResultsList(Results { ids, ..results }), error: None }
        }
        Err(e) => Step { next: MenuState::ResultsList(results), error: Some(e) },
    }
}

/// Repositories from the finished cache scan, or `None` if it is still
/// running after `timeout`.
async fn local_listing_step(index: &CacheIndex, timeout: Duration) -> Option<MenuState> {
    if !index.wait_ready(timeout).await {
        return None;
    }
    Some(MenuState::ResultsList(Results {
        category: Category::Downloaded,
        source: ResultSource::LocalCache,
        ids: index.snapshot().unwrap_or_default(),
    }))
}

fn notice_if_empty(state: &MenuState) {
    if let MenuState::ResultsList(results) = state {
        if results.ids.is_empty() {
            print_notice("❌ No models found.");
        }
    }
}

impl Navigator {
    pub fn new(
        settings: Settings,
        hub: HubClient,
        index: Arc<CacheIndex>,
        hardware: HardwareProfile,
    ) -> NavResult<Self> {
        let pager = Pager::new(settings.hub.page_size);
        Ok(Self {
            settings,
            hub,
            index,
            hardware,
            prompt: Prompter::new()?,
            pager,
        })
    }

    /// Runs the menu until the user exits.
    pub async fn run(&mut self) -> NavResult<()> {
        let mut state = MenuState::CategorySelect;
        loop {
            state = match state {
                MenuState::CategorySelect => self.category_select().await?,
                MenuState::FreeTextQuery => self.free_text_query().await?,
                MenuState::ResultsList(results) => self.results_list(results).await?,
                MenuState::Exit => break,
            };
        }
        println!("\n{}", FAREWELL);
        Ok(())
    }

    async fn category_select(&mut self) -> NavResult<MenuState> {
        clear_screen();
        print_header(&self.hardware, &self.index);

        let mut labels: Vec<String> = Category::ALL.iter().map(|c| c.label().to_string()).collect();
        labels.push("❌ Exit".to_string());

        let category = match self.prompt.select("What do you want to explore today?", &labels)? {
            Answer::Value(i) => match Category::ALL.get(i) {
                Some(category) => *category,
                None => return Ok(MenuState::Exit),
            },
            Answer::Cancelled | Answer::Interrupted => return Ok(MenuState::Exit),
        };

        info!("Category selected: {:?}", category);
        self.pager.select_category(category);

        match category {
            Category::ManualSearch => Ok(MenuState::FreeTextQuery),
            Category::Downloaded => self.local_listing().await,
            other => match other.search_tag() {
                Some(tag) => self.search(other, tag.to_string()).await,
                None => Ok(MenuState::CategorySelect),
            },
        }
    }

    async fn free_text_query(&mut self) -> NavResult<MenuState> {
        let answer = self.prompt.text("Model name (e.g. Mistral):")?;
        match query_step(answer) {
            QueryStep::Search(query) => self.search(Category::ManualSearch, query).await,
            QueryStep::Goto(next) => Ok(next),
        }
    }

    async fn search(&mut self, category: Category, term: String) -> NavResult<MenuState> {
        let step = search_step(&self.hub, &self.pager, category, term).await;
        match step.error {
            Some(e) => {
                print_error("Connection error", &e);
                self.pause_or_exit(step.next)
            }
            None => {
                notice_if_empty(&step.next);
                Ok(step.next)
            }
        }
    }

    async fn local_listing(&mut self) -> NavResult<MenuState> {
        if !self.index.is_ready() {
            println!("⏳ Waiting for the disk scan...");
        }
        let timeout = Duration::from_secs(self.settings.cache.wait_timeout_secs);
        match local_listing_step(&self.index, timeout).await {
            Some(next) => {
                notice_if_empty(&next);
                Ok(next)
            }
            None => {
                warn!("Cache scan not ready after {:?}", timeout);
                print_notice(&format!("The cache scan did not finish within {} seconds.", timeout.as_secs()));
                self.pause_or_exit(MenuState::CategorySelect)
            }
        }
    }

    async fn results_list(&mut self, results: Results) -> NavResult<MenuState> {
        let mut labels: Vec<String> = results
            .ids
            .iter()
            .map(|id| result_label(&self.hub.model_url(id), self.index.contains(id)))
            .collect();
        if results.can_load_more() {
            labels.push(format!("⬇️  Load {} more...", self.pager.page_size()));
        }
        labels.push("⬅️  Back to menu".to_string());

        let answer = self.prompt.select(&format!("Results ({}):", results.ids.len()), &labels)?;
        match results_step(results, answer) {
            ResultsStep::Analyze(results, repo_id) => self.analyze(results, &repo_id).await,
            ResultsStep::LoadMore(results) => {
                let step = load_more_step(&self.hub, &mut self.pager, results).await;
                if let Some(e) = &step.error {
                    print_error("Connection error", e);
                }
                Ok(step.next)
            }
            ResultsStep::Goto(next) => Ok(next),
        }
    }

    async fn analyze(&mut self, results: Results, repo_id: &str) -> NavResult<MenuState> {
        match AnalyzerLauncher::locate(&self.settings) {
            Ok(launcher) => match launcher.launch(repo_id).await {
                Ok(status) if !status.success() => {
                    print_notice(&format!("Analyzer exited with {}", status));
                }
                Ok(_) => {}
                Err(e) => print_error("Error", &e),
            },
            Err(e) => print_error("Error", &e),
        }

        println!("\n{}", "-".repeat(50));
        let label = results.category.label();
        let next = after_analyzer(results, self.prompt.pause()?);
        if matches!(next, MenuState::ResultsList(_)) {
            clear_screen();
            println!("{}", format!("--- Viewing results for: {} ---", label).bright_black());
        }
        Ok(next)
    }

    fn pause_or_exit(&mut self, next: MenuState) -> NavResult<MenuState> {
        match self.prompt.pause()? {
            Answer::Interrupted => Ok(MenuState::Exit),
            _ => Ok(next),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use mockito::Matcher;
    use crate::config::HubConfig;

    fn hub_at(endpoint: String) -> HubClient {
        HubClient::new(&HubConfig { endpoint, token: None, page_size: 10, timeout_secs: 5 }).unwrap()
    }

    fn coder_results(ids: &[&str]) -> Results {
        Results {
            category: Category::Coding,
            source: ResultSource::Search { term: "coder".to_string() },
            ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn empty_query_returns_to_categories() {
        assert_eq!(query_step(Answer::Value(String::new())), QueryStep::Goto(MenuState::CategorySelect));
        assert_eq!(query_step(Answer::Cancelled), QueryStep::Goto(MenuState::CategorySelect));
        assert_eq!(query_step(Answer::Interrupted), QueryStep::Goto(MenuState::Exit));
        assert_eq!(query_step(Answer::Value("mistral".to_string())), QueryStep::Search("mistral".to_string()));
    }

    #[test]
    fn picking_a_model_returns_to_the_same_list() {
        let results = coder_results(&["a/one", "b/two"]);
        let step = results_step(results.clone(), Answer::Value(1));
        let ResultsStep::Analyze(kept, repo_id) = step else {
            panic!("expected analyze, got {:?}", step);
        };
        assert_eq!(repo_id, "b/two");
        assert_eq!(after_analyzer(kept, Answer::Value(())), MenuState::ResultsList(results.clone()));
        assert_eq!(after_analyzer(results, Answer::Interrupted), MenuState::Exit);
    }

    #[test]
    fn results_prompt_controls() {
        let results = coder_results(&["a/one"]);
        assert_eq!(results_step(results.clone(), Answer::Value(1)), ResultsStep::LoadMore(results.clone()));
        assert_eq!(results_step(results.clone(), Answer::Value(2)), ResultsStep::Goto(MenuState::CategorySelect));
        assert_eq!(results_step(results.clone(), Answer::Cancelled), ResultsStep::Goto(MenuState::CategorySelect));
        assert_eq!(results_step(results, Answer::Interrupted), ResultsStep::Goto(MenuState::Exit));
    }

    #[tokio::test]
    async fn search_error_goes_back_to_categories() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/models")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let step = search_step(&hub_at(server.url()), &Pager::new(10), Category::Coding, "coder".to_string()).await;
        assert_eq!(step.next, MenuState::CategorySelect);
        assert!(matches!(step.error, Some(HubError::Status { .. })));
    }

    #[tokio::test]
    async fn empty_search_still_shows_the_list() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/models")
            .match_query(Matcher::UrlEncoded("limit".into(), "10".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let step = search_step(&hub_at(server.url()), &Pager::new(10), Category::Small, "smol".to_string()).await;
        assert!(step.error.is_none());
        let MenuState::ResultsList(results) = step.next else {
            panic!("expected results list");
        };
        assert!(results.ids.is_empty());
        assert_eq!(results.action_at(0), ResultsAction::LoadMore);
    }

    #[tokio::test]
    async fn failed_load_more_keeps_list_and_limit() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/models")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let mut pager = Pager::new(10);
        pager.select_category(Category::Coding);
        let results = coder_results(&["a/one", "b/two"]);

        let step = load_more_step(&hub_at(server.url()), &mut pager, results.clone()).await;
        assert!(step.error.is_some());
        assert_eq!(step.next, MenuState::ResultsList(results));
        assert_eq!(pager.limit(), 10);
    }

    #[tokio::test]
    async fn successful_load_more_commits_the_limit() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/models")
            .match_query(Matcher::UrlEncoded("limit".into(), "20".into()))
            .with_status(200)
            .with_body(r#"[{"id": "a/one"}, {"id": "b/two"}, {"id": "c/three"}]"#)
            .create_async()
            .await;

        let mut pager = Pager::new(10);
        pager.select_category(Category::Coding);

        let step = load_more_step(&hub_at(server.url()), &mut pager, coder_results(&["a/one"])).await;
        assert!(step.error.is_none());
        assert_eq!(step.next, MenuState::ResultsList(coder_results(&["a/one", "b/two", "c/three"])));
        assert_eq!(pager.limit(), 20);
    }

    #[tokio::test]
    async fn downloaded_lists_the_published_index_without_load_more() {
        let index = CacheIndex::new();
        index.publish(["z/last".to_string(), "a/first".to_string()].into_iter().collect::<HashSet<_>>());

        let next = local_listing_step(&index, Duration::from_millis(50)).await.unwrap();
        let MenuState::ResultsList(results) = next else {
            panic!("expected results list");
        };
        assert_eq!(results.ids, vec!["a/first", "z/last"]);
        assert!(!results.can_load_more());
        assert_eq!(results.action_at(2), ResultsAction::Back);
    }

    #[tokio::test]
    async fn downloaded_gives_up_when_scan_never_finishes() {
        let index = CacheIndex::new();
        assert!(local_listing_step(&index, Duration::from_millis(50)).await.is_none());
    }
}
