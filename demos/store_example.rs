//! Store example with a todo list driven by actions

use handoff::{Action, StoreManager};

#[derive(Clone, Debug)]
struct TodoItem {
    id: usize,
    text: String,
    completed: bool,
}

#[derive(Clone, Debug, Default)]
struct AppState {
    todos: Vec<TodoItem>,
}

enum TodoAction {
    Add(String),
    Complete(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum TodoKind {
    Add,
    Complete,
}

impl Action for TodoAction {
    type Kind = TodoKind;

    fn kind(&self) -> TodoKind {
        match self {
            TodoAction::Add(_) => TodoKind::Add,
            TodoAction::Complete(_) => TodoKind::Complete,
        }
    }
}

fn main() {
    println!("=== Store Example ===\n");

    let manager: StoreManager<AppState, TodoAction> = StoreManager::new(AppState::default);
    let store = manager.allocate_store();

    store.subscribe(TodoKind::Add, |action, state| {
        if let TodoAction::Add(text) = action {
            state.todos.push(TodoItem {
                id: state.todos.len() + 1,
                text: text.clone(),
                completed: false,
            });
        }
    });
    store.subscribe(TodoKind::Complete, |action, state| {
        if let TodoAction::Complete(id) = action {
            if let Some(todo) = state.todos.iter_mut().find(|t| t.id == *id) {
                todo.completed = true;
            }
        }
    });

    // Logging subscriber, registered on both kinds
    let report = store.subscribe(TodoKind::Add, |_, state| {
        println!(
            "State updated! Active todos: {}",
            state.todos.iter().filter(|t| !t.completed).count()
        );
    });
    store.on(TodoKind::Complete, &report);

    println!("Adding todo...");
    store.dispatch(TodoAction::Add("Learn Handoff".to_string()));

    println!("\nCompleting todo...");
    store.dispatch(TodoAction::Complete(1));

    println!("\nFinal state: {:#?}", store.get());
}
