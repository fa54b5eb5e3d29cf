//! A main page hands a comment draft to a secondary page by store id.
//!
//! Run with `RUST_LOG=handoff=trace cargo run --example page_handoff` to see
//! the store lifecycle.

use handoff::{Action, StoreManager};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Default)]
struct Draft {
    comment: String,
    attachments: Vec<String>,
    images: Vec<String>,
    secondary_page_title: String,
}

#[derive(Debug)]
enum DraftAction {
    Submit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum DraftActionKind {
    Submit,
}

impl Action for DraftAction {
    type Kind = DraftActionKind;

    fn kind(&self) -> DraftActionKind {
        match self {
            DraftAction::Submit => DraftActionKind::Submit,
        }
    }
}

/// Stand-in for the host's navigation stack.
struct Navigator {
    stack: Vec<String>,
}

impl Navigator {
    fn navigate_to(&mut self, url: String) {
        println!("navigate -> {url}");
        self.stack.push(url);
    }

    fn current_param(&self, name: &str) -> Option<&str> {
        let (_, query) = self.stack.last()?.split_once('?')?;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

fn main() -> Result<(), handoff::StoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let manager: StoreManager<Draft, DraftAction> = StoreManager::new(Draft::default);
    let mut navigator = Navigator { stack: Vec::new() };

    // Main page attached
    let store = manager.allocate_store();
    store.update(|draft| draft.secondary_page_title = "Leave a comment".to_string());
    store.subscribe(DraftActionKind::Submit, |_, draft| {
        println!(
            "main page: loading, submitting {:?} with {} attachment(s) and {} image(s)",
            draft.comment,
            draft.attachments.len(),
            draft.images.len()
        );
    });
    navigator.navigate_to(format!("pages/comment?store1Id={}", store.id()));

    // Secondary page attached
    let page_store = manager.get_store(navigator.current_param("store1Id"))?;
    println!(
        "secondary page: title = {}",
        page_store.read(|draft| draft.secondary_page_title.clone())
    );

    // Secondary page input and submit
    page_store.update(|draft| {
        draft.attachments.clear();
        draft.images.clear();
        draft.comment = "Ship it".to_string();
    });
    page_store.dispatch(DraftAction::Submit);

    // Main page detached
    manager.free_store(store.id())?;

    // A stale id now fails loudly
    if let Err(err) = manager.get_store(navigator.current_param("store1Id")) {
        println!("after free: {err}");
    }

    Ok(())
}
