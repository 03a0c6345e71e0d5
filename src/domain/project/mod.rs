pub mod model;
pub mod service;

// 公開APIの再エクスポート
pub use model::{Project, ProjectListing, ProjectQuery, ProjectStatus, StatusStats, TechnologyStat};
pub use service::list_projects_with_client;
