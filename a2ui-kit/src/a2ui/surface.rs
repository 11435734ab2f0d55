//! A2UI Surface Rendering
//!
//! Entry point for hosts: renders one surface, or every surface of a
//! processor, through the host's [`RenderPrimitives`].

use super::{
    config::{A2uiConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES},
    primitives::{ActionCallback, RenderPrimitives},
    processor::Surface,
    resolver::{ComponentResolver, RenderContext},
};

/// Renders surfaces into host nodes.
///
/// # Example
///
/// ```rust,ignore
/// let mut primitives = OutlinePrimitives;
/// let on_action = ignore_actions();
///
/// let nodes = SurfaceRenderer::new(&mut primitives)
///     .with_max_depth(32)
///     .render_all(processor.surfaces(), &on_action);
/// ```
pub struct SurfaceRenderer<'p, P: RenderPrimitives> {
    primitives: &'p mut P,
    max_depth: usize,
    max_nodes: usize,
}

impl<'p, P: RenderPrimitives> SurfaceRenderer<'p, P> {
    pub fn new(primitives: &'p mut P) -> Self {
        SurfaceRenderer {
            primitives,
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Components rendered per surface before the rest render as errors
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_config(self, config: &A2uiConfig) -> Self {
        self.with_max_depth(config.max_depth)
            .with_max_nodes(config.max_nodes)
    }

    /// Render one surface from its root.
    ///
    /// A surface with no root yet, a root that is not registered, or a root
    /// of an unsupported kind renders the host's placeholder instead of
    /// nothing.
    pub fn render_surface(&mut self, surface: &Surface, on_action: &ActionCallback) -> P::Node {
        let Some(root) = surface.root() else {
            log::debug!("[A2UI] Surface `{}` has no root yet", surface.id());
            return self.primitives.surface_placeholder(surface.id());
        };
        if !surface.components().contains(root) {
            log::debug!(
                "[A2UI] Root `{}` of surface `{}` is not registered yet",
                root,
                surface.id()
            );
            return self.primitives.surface_placeholder(surface.id());
        }

        let ctx = RenderContext {
            surface_id: surface.id(),
            components: surface.components(),
            data_model: surface.data_model().as_value(),
            scope_path: "/",
            on_action,
        };
        let node = ComponentResolver::new(&mut *self.primitives, self.max_depth)
            .with_max_nodes(self.max_nodes)
            .resolve(root, ctx);

        node.unwrap_or_else(|| self.primitives.surface_placeholder(surface.id()))
    }

    /// Render every surface in order; empty only when there are none.
    pub fn render_all<'s>(
        &mut self,
        surfaces: impl IntoIterator<Item = &'s Surface>,
        on_action: &ActionCallback,
    ) -> Vec<P::Node> {
        surfaces
            .into_iter()
            .map(|surface| self.render_surface(surface, on_action))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a2ui::{
        message::{ActionContextItem, TextUsageHint},
        outline::{OutlineNode, OutlinePrimitives},
        primitives::{ActionCallback, ignore_actions},
        processor::A2uiMessageProcessor,
    };
    use serde_json::{Value, json};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn render_all(processor: &A2uiMessageProcessor) -> Vec<OutlineNode> {
        let mut primitives = OutlinePrimitives;
        SurfaceRenderer::new(&mut primitives).render_all(processor.surfaces(), &ignore_actions())
    }

    fn hello_batch() -> Vec<Value> {
        vec![
            json!({"beginRendering": {"surfaceId": "main", "root": "title"}}),
            json!({"surfaceUpdate": {"surfaceId": "main", "components": [
                {"id": "title", "component": {"Text": {"text": {"literalString": "Hello"}, "usageHint": "h1"}}}
            ]}}),
        ]
    }

    #[test]
    fn test_end_to_end_heading() {
        let mut processor = A2uiMessageProcessor::new();
        processor.process_values(&hello_batch());

        assert_eq!(
            render_all(&processor),
            vec![OutlineNode::Text {
                text: "Hello".to_string(),
                usage_hint: TextUsageHint::H1,
            }]
        );
    }

    #[test]
    fn test_processing_is_idempotent() {
        let batch = hello_batch();
        let mut once = A2uiMessageProcessor::new();
        once.process_values(&batch);

        let mut twice = A2uiMessageProcessor::new();
        twice.process_values(&batch);
        twice.process_values(&batch);

        assert_eq!(
            once.get_surface("main").unwrap().components(),
            twice.get_surface("main").unwrap().components()
        );
        assert_eq!(render_all(&once), render_all(&twice));
    }

    #[test]
    fn test_placeholder_without_renderable_root() {
        let mut processor = A2uiMessageProcessor::new();
        processor.process_values(&[
            json!({"surfaceUpdate": {"surfaceId": "no-root", "components": []}}),
            json!({"beginRendering": {"surfaceId": "pending", "root": "later"}}),
            json!({"beginRendering": {"surfaceId": "exotic", "root": "x"}}),
            json!({"surfaceUpdate": {"surfaceId": "exotic", "components": [
                {"id": "x", "component": {"Chart": {"series": []}}}
            ]}}),
        ]);

        let placeholders: Vec<OutlineNode> = ["no-root", "pending", "exotic"]
            .iter()
            .map(|id| OutlineNode::Placeholder {
                surface_id: id.to_string(),
            })
            .collect();
        assert_eq!(render_all(&processor), placeholders);
    }

    #[test]
    fn test_render_all_follows_surface_order() {
        let processor = A2uiMessageProcessor::new();
        assert!(render_all(&processor).is_empty());

        let mut processor = A2uiMessageProcessor::new();
        processor.process_values(&[
            json!({"beginRendering": {"surfaceId": "second", "root": "t"}}),
            json!({"beginRendering": {"surfaceId": "first", "root": "t"}}),
            json!({"surfaceUpdate": {"surfaceId": "first", "components": [
                {"id": "t", "component": {"Text": {"text": "from first"}}}
            ]}}),
        ]);

        let nodes = render_all(&processor);
        assert_eq!(nodes.len(), 2);
        assert!(matches!(&nodes[0], OutlineNode::Placeholder { surface_id } if surface_id == "second"));
        assert_eq!(nodes[1].texts(), vec!["from first"]);
    }

    #[test]
    fn test_data_driven_file_list() {
        let mut processor = A2uiMessageProcessor::new();
        processor.process_values(&[
            json!({"beginRendering": {"surfaceId": "files", "root": "root"}}),
            json!({"surfaceUpdate": {"surfaceId": "files", "components": [
                {"id": "root", "component": {"Column": {"children": {"explicitList": ["heading", "list"]}}}},
                {"id": "heading", "component": {"Text": {"text": {"path": "/title"}, "usageHint": "h2"}}},
                {"id": "list", "component": {"List": {"children": {"template": {"componentId": "file", "dataBinding": "/files"}}}}},
                {"id": "file", "component": {"Text": {"text": {"path": "/name"}}}}
            ]}}),
            json!({"dataModelUpdate": {"surfaceId": "files", "contents": [
                {"key": "title", "valueString": "Files"},
                {"key": "files", "valueMap": [
                    {"key": "name", "valueString": "a.txt"},
                    {"key": "name", "valueString": "b.txt"}
                ]}
            ]}}),
        ]);

        let nodes = render_all(&processor);
        assert_eq!(nodes[0].texts(), vec!["Files", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_edited_input_round_trips_through_the_model() {
        let mut processor = A2uiMessageProcessor::new();
        processor.process_values(&[
            json!({"beginRendering": {"surfaceId": "form", "root": "root"}}),
            json!({"surfaceUpdate": {"surfaceId": "form", "components": [
                {"id": "root", "component": {"Column": {"children": {"explicitList": ["name", "greeting"]}}}},
                {"id": "name", "component": {"TextField": {"text": {"path": "/user/name"}, "label": "Name"}}},
                {"id": "greeting", "component": {"Text": {"text": {"path": "/user/name"}}}}
            ]}}),
        ]);

        let nodes = render_all(&processor);
        let OutlineNode::TextField { text, binding, .. } = &nodes[0].children()[0] else {
            panic!("Expected TextField, got {:?}", nodes[0].children()[0]);
        };
        assert_eq!(text, "");
        let binding = binding.clone().unwrap();

        processor.set_data("form", &binding, json!("Ada"));
        let nodes = render_all(&processor);
        assert_eq!(nodes[0].texts(), vec!["Ada"]);
        assert!(matches!(
            &nodes[0].children()[0],
            OutlineNode::TextField { text, .. } if text == "Ada"
        ));
    }

    #[test]
    fn test_config_node_budget_applies() {
        let mut processor = A2uiMessageProcessor::new();
        processor.process_values(&[
            json!({"beginRendering": {"surfaceId": "main", "root": "root"}}),
            json!({"surfaceUpdate": {"surfaceId": "main", "components": [
                {"id": "root", "component": {"Column": {"children": {"explicitList": ["a", "b", "c"]}}}},
                {"id": "a", "component": {"Text": {"text": "a"}}},
                {"id": "b", "component": {"Text": {"text": "b"}}},
                {"id": "c", "component": {"Text": {"text": "c"}}}
            ]}}),
        ]);
        let config = A2uiConfig {
            max_nodes: 3,
            ..Default::default()
        };

        let mut primitives = OutlinePrimitives;
        let surface = processor.get_surface("main").unwrap();
        let node = SurfaceRenderer::new(&mut primitives)
            .with_config(&config)
            .render_surface(surface, &ignore_actions());
        assert_eq!(node.texts(), vec!["a", "b"]);
        assert!(matches!(&node.children()[2], OutlineNode::Error { kind, .. } if kind == "Text"));
    }

    #[test]
    fn test_button_reports_user_action() {
        let mut processor = A2uiMessageProcessor::new();
        processor.process_values(&[
            json!({"beginRendering": {"surfaceId": "form", "root": "submit"}}),
            json!({"surfaceUpdate": {"surfaceId": "form", "components": [
                {"id": "submit", "component": {"Button": {
                    "child": "label",
                    "action": {"name": "submit", "context": [{"key": "email", "value": {"path": "/email"}}]}
                }}},
                {"id": "label", "component": {"Text": {"text": "Submit"}}}
            ]}}),
            json!({"dataModelUpdate": {"surfaceId": "form", "contents": [
                {"key": "email", "valueString": "a@b.c"}
            ]}}),
        ]);

        let fired = Rc::new(RefCell::new(Vec::new()));
        let recorder = fired.clone();
        let on_action: ActionCallback = Rc::new(move |name: &str, _: &[ActionContextItem]| {
            recorder.borrow_mut().push(name.to_string());
        });

        let surface = processor.get_surface("form").unwrap();
        let mut primitives = OutlinePrimitives;
        let node = SurfaceRenderer::new(&mut primitives)
            .with_max_depth(8)
            .render_surface(surface, &on_action);

        let activations = node.activations();
        assert_eq!(activations.len(), 1);
        activations[0].activate();
        assert_eq!(*fired.borrow(), vec!["submit".to_string()]);

        let message = activations[0].to_user_action().to_envelope();
        assert_eq!(
            message,
            json!({"userAction": {
                "surfaceId": "form",
                "componentId": "submit",
                "action": {"name": "submit", "context": {"email": "a@b.c"}}
            }})
        );
    }
}
