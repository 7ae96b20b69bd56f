//! MCP tool servers for PCF development workflows.
//!
//! The servers cover the mechanical parts of the workflow an agent drives:
//! persisting the work-item hierarchy extracted from requirements, searching
//! and editing workspace files, and stamping out source stubs per user story.

pub mod codegen;
pub mod config;
pub mod error;
pub mod files;
pub mod mcp;
pub mod models;
pub mod work_items;
