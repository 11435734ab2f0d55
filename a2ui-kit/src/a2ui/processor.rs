//! A2UI Message Processor
//!
//! Applies incoming A2UI messages to the surfaces they address. The
//! processor is the only writer of surface state; hosts read surfaces
//! through it and hand them to the renderer.

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_json::Value;

use super::{
    config::A2uiConfig,
    data_model::DataModel,
    message::*,
    registry::ComponentRegistry,
    repair::repair_json,
};

/// A UI surface: its component registry, data model, root and styles.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    id: String,
    root: Option<String>,
    styles: Option<SurfaceStyles>,
    components: ComponentRegistry,
    data_model: DataModel,
    needs_redraw: bool,
}

impl Surface {
    fn new(id: &str) -> Self {
        Surface {
            id: id.to_string(),
            root: None,
            styles: None,
            components: ComponentRegistry::new(),
            data_model: DataModel::new(),
            needs_redraw: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Root component ID, once a `beginRendering` has named one
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn styles(&self) -> Option<&SurfaceStyles> {
        self.styles.as_ref()
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    pub fn get_component(&self, id: &str) -> Option<&ComponentDefinition> {
        self.components.get(id)
    }

    pub fn data_model(&self) -> &DataModel {
        &self.data_model
    }

    /// Whether anything changed since the host last called `mark_rendered`
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }
}

/// Events that can be emitted by the processor
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessorEvent {
    SurfaceCreated {
        surface_id: String,
    },
    RenderingBegan {
        surface_id: String,
        root: String,
    },
    SurfaceUpdated {
        surface_id: String,
        updated_components: Vec<String>,
    },
    DataModelUpdated {
        surface_id: String,
        updated_keys: Vec<String>,
    },
    ActionQueued {
        surface_id: String,
        name: String,
    },
    SurfaceEvicted {
        surface_id: String,
    },
}

/// The A2UI message processor.
///
/// Owns every surface of one agent session, keyed by surface id and kept in
/// first-created order. Create one per session and drop it (or `clear` it)
/// when the session ends. With `max_surfaces` set, creating a surface beyond
/// the cap evicts the oldest one.
///
/// # Example
///
/// ```rust,ignore
/// let mut processor = A2uiMessageProcessor::new();
///
/// let json = r#"[{"beginRendering": {"surfaceId": "main", "root": "root"}}]"#;
/// for event in processor.process_json(json)? {
///     if let ProcessorEvent::SurfaceCreated { surface_id } = event {
///         println!("Surface created: {}", surface_id);
///     }
/// }
/// ```
#[derive(Debug, Default)]
pub struct A2uiMessageProcessor {
    surfaces: IndexMap<String, Surface>,

    /// `userAction` messages received, oldest first
    pending_actions: Vec<UserAction>,

    max_surfaces: Option<usize>,
}

impl A2uiMessageProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &A2uiConfig) -> Self {
        A2uiMessageProcessor {
            max_surfaces: config.max_surfaces,
            ..Self::default()
        }
    }

    pub fn get_surface(&self, surface_id: &str) -> Option<&Surface> {
        self.surfaces.get(surface_id)
    }

    /// All surfaces in first-created order
    pub fn surfaces(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.values()
    }

    pub fn surface_ids(&self) -> impl Iterator<Item = &str> {
        self.surfaces.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Clear the redraw flag after the host rendered a surface
    pub fn mark_rendered(&mut self, surface_id: &str) {
        if let Some(surface) = self.surfaces.get_mut(surface_id) {
            surface.needs_redraw = false;
        }
    }

    /// Drop a surface on behalf of the host
    pub fn evict_surface(&mut self, surface_id: &str) -> Option<Surface> {
        let evicted = self.surfaces.shift_remove(surface_id);
        if evicted.is_some() {
            log::info!("[A2UI] Evicted surface `{}`", surface_id);
        }
        evicted
    }

    /// Drop every surface and pending action
    pub fn clear(&mut self) {
        self.surfaces.clear();
        self.pending_actions.clear();
    }

    /// Write a value into a surface's data model on behalf of the host.
    ///
    /// This is how edits to bound inputs flow back: pass the input's
    /// `binding` path and the new value. Unknown surfaces are left alone.
    pub fn set_data(&mut self, surface_id: &str, path: &str, value: Value) -> Option<ProcessorEvent> {
        let Some(surface) = self.surfaces.get_mut(surface_id) else {
            log::warn!("[A2UI] Cannot set `{}` on unknown surface `{}`", path, surface_id);
            return None;
        };

        let version = surface.data_model.version();
        surface.data_model.set(path, value);
        if surface.data_model.version() == version {
            return None;
        }
        surface.needs_redraw = true;

        Some(ProcessorEvent::DataModelUpdated {
            surface_id: surface_id.to_string(),
            updated_keys: vec![path.to_string()],
        })
    }

    /// Take pending user actions (clears the queue)
    pub fn take_pending_actions(&mut self) -> Vec<UserAction> {
        std::mem::take(&mut self.pending_actions)
    }

    /// Process a single decoded message
    pub fn process_message(&mut self, message: A2uiMessage) -> Vec<ProcessorEvent> {
        let mut events = Vec::new();
        match message {
            A2uiMessage::BeginRendering(msg) => self.process_begin_rendering(msg, &mut events),
            A2uiMessage::SurfaceUpdate(msg) => self.process_surface_update(msg, &mut events),
            A2uiMessage::DataModelUpdate(msg) => {
                self.process_data_model_update(msg, &mut events)
            }
            A2uiMessage::UserAction(msg) => self.process_user_action(msg, &mut events),
            A2uiMessage::Unknown { tag } => {
                log::debug!("[A2UI] Ignoring unknown message `{}`", tag);
            }
        }
        events
    }

    /// Process decoded messages strictly in order
    pub fn process_messages(
        &mut self,
        messages: impl IntoIterator<Item = A2uiMessage>,
    ) -> Vec<ProcessorEvent> {
        messages
            .into_iter()
            .flat_map(|message| self.process_message(message))
            .collect()
    }

    /// Decode and process raw JSON messages in order.
    ///
    /// Messages that cannot be decoded are logged and skipped; the rest of
    /// the batch still applies.
    pub fn process_values(&mut self, values: &[Value]) -> Vec<ProcessorEvent> {
        let mut events = Vec::new();
        for (i, value) in values.iter().enumerate() {
            match A2uiMessage::from_value(value) {
                Ok(message) => events.extend(self.process_message(message)),
                Err(e) => log::warn!("[A2UI] Skipping message[{}]: {}", i, e),
            }
        }
        events
    }

    /// Parse and process JSON text holding one message or an array of them.
    ///
    /// Common damage in agent output (comments, trailing commas, truncation)
    /// is repaired first. Fails only if the text is still not JSON.
    pub fn process_json(&mut self, json: &str) -> Result<Vec<ProcessorEvent>, serde_json::Error> {
        let repaired = repair_json(json);
        let value: Value = serde_json::from_str(&repaired)?;

        Ok(match value {
            Value::Array(items) => self.process_values(&items),
            single => self.process_values(std::slice::from_ref(&single)),
        })
    }

    // ========================================================================
    // Private processing methods
    // ========================================================================

    /// Get the addressed surface, creating it (and evicting if capped) on
    /// first reference.
    fn surface_mut(&mut self, surface_id: &str, events: &mut Vec<ProcessorEvent>) -> &mut Surface {
        if !self.surfaces.contains_key(surface_id) {
            if let Some(cap) = self.max_surfaces {
                while self.surfaces.len() >= cap.max(1) {
                    let Some((evicted, _)) = self.surfaces.shift_remove_index(0) else {
                        break;
                    };
                    log::info!(
                        "[A2UI] Surface cap {} reached, evicting `{}`",
                        cap,
                        evicted
                    );
                    events.push(ProcessorEvent::SurfaceEvicted {
                        surface_id: evicted,
                    });
                }
            }
        }

        match self.surfaces.entry(surface_id.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                log::debug!("[A2UI] Creating surface `{}`", surface_id);
                events.push(ProcessorEvent::SurfaceCreated {
                    surface_id: surface_id.to_string(),
                });
                entry.insert(Surface::new(surface_id))
            }
        }
    }

    fn process_begin_rendering(&mut self, msg: BeginRendering, events: &mut Vec<ProcessorEvent>) {
        let surface = self.surface_mut(&msg.surface_id, events);

        if let Some(styles) = msg.styles {
            surface.styles = Some(styles);
        }
        if let Some(root) = msg.root {
            surface.root = Some(root.clone());
            events.push(ProcessorEvent::RenderingBegan {
                surface_id: msg.surface_id,
                root,
            });
        }
        surface.needs_redraw = true;
    }

    fn process_surface_update(&mut self, msg: SurfaceUpdate, events: &mut Vec<ProcessorEvent>) {
        let surface = self.surface_mut(&msg.surface_id, events);

        let mut updated_components = Vec::with_capacity(msg.components.len());
        for component in msg.components {
            updated_components.push(component.id.clone());
            surface.components.upsert(component);
        }
        surface.needs_redraw = true;

        events.push(ProcessorEvent::SurfaceUpdated {
            surface_id: msg.surface_id,
            updated_components,
        });
    }

    fn process_data_model_update(
        &mut self,
        msg: DataModelUpdate,
        events: &mut Vec<ProcessorEvent>,
    ) {
        let surface = self.surface_mut(&msg.surface_id, events);

        let updated_keys = surface.data_model.apply_updates(&msg.path, &msg.contents);
        surface.needs_redraw = true;

        events.push(ProcessorEvent::DataModelUpdated {
            surface_id: msg.surface_id,
            updated_keys,
        });
    }

    fn process_user_action(&mut self, msg: UserAction, events: &mut Vec<ProcessorEvent>) {
        self.surface_mut(&msg.surface_id, events);

        events.push(ProcessorEvent::ActionQueued {
            surface_id: msg.surface_id.clone(),
            name: msg.action.name.clone(),
        });
        self.pending_actions.push(msg);
    }
}
