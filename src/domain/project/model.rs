use crate::domain::null_as_default;
use crate::domain::stats::NamedCount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 技術スタック統計（技術名と採用プロジェクト数）
pub type TechnologyStat = NamedCount;

/// プロジェクトの進行状態（閉じた3値）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Completed,
    InProgress,
    Planned,
}

impl ProjectStatus {
    /// リモート側で使われる文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InProgress => "in-progress",
            Self::Planned => "planned",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// プロジェクトエンティティ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub category: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub view_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reading_time: u64,
}

/// 状態ごとのプロジェクト数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: u64,
    #[serde(
        rename = "in-progress",
        default,
        deserialize_with = "null_as_default"
    )]
    pub in_progress: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub planned: u64,
}

impl StatusStats {
    pub fn get(&self, status: ProjectStatus) -> u64 {
        match status {
            ProjectStatus::Completed => self.completed,
            ProjectStatus::InProgress => self.in_progress,
            ProjectStatus::Planned => self.planned,
        }
    }
}

/// プロジェクト一覧と統計
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectListing {
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<TechnologyStat>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status_stats: StatusStats,
}

/// プロジェクト一覧の検索条件
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectQuery {
    pub status: Option<ProjectStatus>,
    pub technology: Option<String>,
    pub sort_by: String,
}

impl Default for ProjectQuery {
    fn default() -> Self {
        Self {
            status: None,
            technology: None,
            sort_by: "default".to_string(),
        }
    }
}
