pub mod todo;

pub use todo::TodoItem;
