//! A2UI Protocol Implementation
//!
//! A2UI (Agent-to-UI) is a declarative JSON protocol for AI agents to generate
//! rich, interactive UIs. This module ingests A2UI messages into per-surface
//! state and resolves that state into nodes of any host UI toolkit.
//!
//! # Architecture
//!
//! ```text
//! A2UI JSON Messages
//!        ↓
//! A2uiMessageProcessor
//!        ↓
//! ┌──────┴──────┐
//! │             │
//! DataModel  ComponentRegistry
//!    │             │
//!    └──────┬──────┘
//!           ↓
//!    SurfaceRenderer → ComponentResolver
//!           ↓
//!    RenderPrimitives (host nodes)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use a2ui_kit::a2ui::*;
//!
//! let mut processor = A2uiMessageProcessor::new();
//! processor.process_json(r#"[
//!     {"beginRendering": {"surfaceId": "main", "root": "title"}},
//!     {"surfaceUpdate": {"surfaceId": "main", "components": [
//!         {"id": "title", "component": {"Text": {"text": "Hello", "usageHint": "h1"}}}
//!     ]}}
//! ]"#)?;
//!
//! let mut primitives = OutlinePrimitives;
//! let nodes = SurfaceRenderer::new(&mut primitives)
//!     .render_all(processor.surfaces(), &ignore_actions());
//! ```

mod config;
mod data_model;
mod error;
mod message;
mod outline;
mod primitives;
mod processor;
mod registry;
mod repair;
mod resolver;
mod surface;
mod template;
mod value;

pub use config::*;
pub use data_model::*;
pub use error::*;
pub use message::*;
pub use outline::*;
pub use primitives::*;
pub use processor::*;
pub use registry::*;
pub use repair::*;
pub use resolver::*;
pub use surface::*;
pub use template::*;
pub use value::*;
