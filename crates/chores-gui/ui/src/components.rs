mod status_badge;
mod task_cards;
mod task_editor;
mod task_list;
mod task_table;

pub use status_badge::StatusBadge;
pub use task_cards::TaskCards;
pub use task_editor::TaskEditor;
pub use task_list::TaskList;
pub use task_table::TaskTable;
