/// Discovery categories offered by the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    ManualSearch,
    Coding,
    Reasoning,
    Chat,
    Vision,
    Roleplay,
    Small,
    Downloaded,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::ManualSearch,
        Category::Coding,
        Category::Reasoning,
        Category::Chat,
        Category::Vision,
        Category::Roleplay,
        Category::Small,
        Category::Downloaded,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::ManualSearch => "🔍 Manual search",
            Category::Coding => "💻 Coding",
            Category::Reasoning => "🧠 Reasoning (R1 style)",
            Category::Chat => "💬 General chat (instruct)",
            Category::Vision => "👁️  Vision / multimodal",
            Category::Roleplay => "🎭 Roleplay / story",
            Category::Small => "🧪 Small models (<3B)",
            Category::Downloaded => "🏠 My downloaded models",
        }
    }

    /// Fixed search term for the predefined categories.
    pub fn search_tag(&self) -> Option<&'static str> {
        match self {
            Category::Coding => Some("coder"),
            Category::Reasoning => Some("reasoning"),
            Category::Chat => Some("instruct"),
            Category::Vision => Some("multimodal"),
            Category::Roleplay => Some("roleplay"),
            Category::Small => Some("smol"),
            Category::ManualSearch | Category::Downloaded => None,
        }
    }

    /// The local listing is complete in one go and has no "load more".
    pub fn is_paginated(&self) -> bool {
        !matches!(self, Category::Downloaded)
    }
}

/// Where a result list came from, needed to fetch the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultSource {
    Search { term: String },
    LocalCache,
}

/// A list of candidate repositories shown in the results menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Results {
    pub category: Category,
    pub source: ResultSource,
    pub ids: Vec<String>,
}

impl Results {
    pub fn can_load_more(&self) -> bool {
        self.category.is_paginated() && matches!(self.source, ResultSource::Search { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState {
    CategorySelect,
    FreeTextQuery,
    ResultsList(Results),
    Exit,
}

/// What the user picked in the results menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsAction {
    Analyze(String),
    LoadMore,
    Back,
}

impl Results {
    /// Maps a menu index onto an action. Entries are the ids, then
    /// "load more" when paginated, then "back".
    pub fn action_at(&self, index: usize) -> ResultsAction {
        if let Some(id) = self.ids.get(index) {
            return ResultsAction::Analyze(id.clone());
        }
        if self.can_load_more() && index == self.ids.len() {
            return ResultsAction::LoadMore;
        }
        ResultsAction::Back
    }
}

/// Result limit for registry searches.
#[derive(Debug, Clone)]
pub struct Pager {
    page_size: usize,
    limit: usize,
    category: Option<Category>,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self { page_size, limit: page_size, category: None }
    }

    /// Resets the limit when the category changes.
    pub fn select_category(&mut self, category: Category) {
        if self.category != Some(category) {
            self.limit = self.page_size;
            self.category = Some(category);
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Limit for "load more"; only takes effect after `commit`.
    pub fn next_limit(&self) -> usize {
        self.limit + self.page_size
    }

    pub fn commit(&mut self, limit: usize) {
        self.limit = limit;
    }
}
