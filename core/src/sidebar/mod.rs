pub mod command;
pub mod format;
pub mod panel;
pub mod rows;
pub mod view;

pub use command::{CommandQueue, DetectKind, EventOutcome, PanelCommand, PanelEvent};
pub use panel::SidebarPanel;
pub use view::{SidebarSection, SidebarView};
