/*
 * This module consolidates the core, platform-agnostic logic of the application:
 * the `PathHelper` file-system layer (and the `WorkingDirectoryOperations`
 * abstraction the presenter uses), the external search tool contract
 * (`SearchToolOperations`), and the persisted configuration
 * (`ConfigManagerOperations`).
 */
pub mod config;
pub mod path_helper;
pub mod path_utils;
pub mod search_tool;

// Re-export config related items
pub use config::{AppSettings, ConfigManagerOperations, CoreConfigManager};

// Re-export path helper related items
pub use path_helper::{PathHelper, WorkingDirectoryOperations};

// Re-export search tool related items
pub use search_tool::{
    CoreP4GrepTool, SearchRequest, SearchResult, SearchToolOperations, build_grep_arguments,
};
