use crate::engine::{QueryEngine, SearchOutcome};
use std::sync::Arc;

/// What the overlay should currently display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Placeholder,
    Loading,
    NoResults,
    Results(Vec<ResultItem>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    pub href: String,
    pub title: String,
    pub excerpt: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ToggleClicked,
    CloseClicked,
    BackdropClicked,
    Escape,
    Input(String),
}

/// Produces the actual markup or terminal output for the overlay.
pub trait Renderer {
    fn set_visible(&mut self, visible: bool);
    fn render(&mut self, view: &View);
}

/// Overlay controller: turns UI events into engine queries and views.
pub struct SearchWidget<R: Renderer> {
    engine: Arc<QueryEngine>,
    renderer: R,
    open: bool,
    input: String,
}

impl<R: Renderer> SearchWidget<R> {
    pub fn new(engine: Arc<QueryEngine>, renderer: R) -> Self {
        Self { engine, renderer, open: false, input: String::new() }
    }

    pub fn is_open(&self) -> bool { self.open }

    pub fn input_text(&self) -> &str { &self.input }

    pub fn renderer(&self) -> &R { &self.renderer }

    pub fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::ToggleClicked => self.open(),
            UiEvent::CloseClicked => self.close(),
            UiEvent::Escape | UiEvent::BackdropClicked => {
                if self.open {
                    self.close();
                }
            }
            UiEvent::Input(text) => self.input(&text),
        }
    }

    pub fn open(&mut self) {
        if self.open {
            return;
        }
        self.open = true;
        self.renderer.set_visible(true);
    }

    pub fn close(&mut self) {
        self.open = false;
        self.input.clear();
        self.renderer.set_visible(false);
        self.renderer.render(&View::Placeholder);
    }

    pub fn input(&mut self, text: &str) {
        self.input = text.to_string();
        let view = self.view_for(text);
        self.renderer.render(&view);
    }

    pub fn view_for(&self, query: &str) -> View {
        match self.engine.search(query) {
            SearchOutcome::Placeholder => View::Placeholder,
            SearchOutcome::NotLoaded => View::Loading,
            SearchOutcome::Matches(hits) if hits.is_empty() => View::NoResults,
            SearchOutcome::Matches(hits) => {
                let config = self.engine.config();
                View::Results(
                    hits.into_iter()
                        .map(|r| ResultItem {
                            href: config.link_for(r),
                            title: r.title.clone(),
                            excerpt: r.excerpt.clone(),
                            tags: r.tags.clone(),
                        })
                        .collect(),
                )
            }
        }
    }
}
