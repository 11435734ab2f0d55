//! Host render primitives.
//!
//! The resolver walks a surface and hands fully resolved properties to a
//! [`RenderPrimitives`] implementation, one call per component. The node
//! type is up to the host: a widget handle, a virtual DOM node, or the
//! [`OutlineNode`](super::outline::OutlineNode) tree bundled with this crate.

use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use super::error::RenderError;
use super::message::*;

/// Host callback invoked when a rendered action fires.
///
/// Receives the action name and its unresolved context descriptors.
pub type ActionCallback = Rc<dyn Fn(&str, &[ActionContextItem])>;

/// A callback that ignores every action.
pub fn ignore_actions() -> ActionCallback {
    Rc::new(|_: &str, _: &[ActionContextItem]| {})
}

/// Per-kind node constructors supplied by the host.
///
/// Constructors may fail; the resolver contains the failure at the failing
/// component and renders [`RenderPrimitives::error`] in its place. The
/// three diagnostic constructors cannot fail.
pub trait RenderPrimitives {
    type Node;

    fn text(&mut self, props: TextProps) -> Result<Self::Node, RenderError>;

    fn button(&mut self, props: ButtonProps) -> Result<Self::Node, RenderError>;

    fn column(
        &mut self,
        props: ColumnProps,
        children: Vec<Self::Node>,
    ) -> Result<Self::Node, RenderError>;

    fn row(&mut self, props: RowProps, children: Vec<Self::Node>)
    -> Result<Self::Node, RenderError>;

    fn list(
        &mut self,
        props: ListProps,
        items: Vec<Self::Node>,
    ) -> Result<Self::Node, RenderError>;

    fn card(&mut self, child: Option<Self::Node>) -> Result<Self::Node, RenderError>;

    fn image(&mut self, props: ImageProps) -> Result<Self::Node, RenderError>;

    fn icon(&mut self, props: IconProps) -> Result<Self::Node, RenderError>;

    fn divider(&mut self, props: DividerProps) -> Result<Self::Node, RenderError>;

    fn spacer(&mut self, props: SpacerProps) -> Result<Self::Node, RenderError>;

    fn text_field(&mut self, props: TextFieldProps) -> Result<Self::Node, RenderError>;

    fn check_box(&mut self, props: CheckBoxProps) -> Result<Self::Node, RenderError>;

    fn slider(&mut self, props: SliderProps) -> Result<Self::Node, RenderError>;

    fn multiple_choice(&mut self, props: MultipleChoiceProps) -> Result<Self::Node, RenderError>;

    /// Shown where a referenced component id is not registered
    fn not_found(&mut self, component_id: &str) -> Self::Node;

    /// Shown in place of a component whose rendering failed
    fn error(&mut self, kind: &str, message: &str) -> Self::Node;

    /// Shown for a surface that has no renderable root yet
    fn surface_placeholder(&mut self, surface_id: &str) -> Self::Node;
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextProps {
    pub text: String,
    pub usage_hint: TextUsageHint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonProps {
    pub label: String,
    pub primary: bool,

    /// `None` when the button declares no action; activating it does nothing
    pub action: Option<Activation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnProps {
    pub alignment: Alignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowProps {
    pub distribution: Distribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListProps {
    pub direction: ListDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageProps {
    pub url: String,
    pub fit: ImageFit,
    pub usage_hint: ImageUsageHint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconProps {
    pub icon: IconName,
    pub size: IconSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DividerProps {
    pub orientation: Orientation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpacerProps {
    pub size: SpacerSize,
}

// Input kinds carry the absolute data model path their value is bound to.
// Hosts write edits back with `A2uiMessageProcessor::set_data`; inputs with
// a literal value have no binding and are read-only.

#[derive(Debug, Clone, PartialEq)]
pub struct TextFieldProps {
    pub text: String,
    pub label: String,
    pub placeholder: String,
    pub input_type: TextInputType,
    pub binding: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckBoxProps {
    pub checked: bool,
    pub label: String,
    pub binding: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliderProps {
    /// Always within `min..=max`
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub step: Option<f64>,
    pub binding: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceProps {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultipleChoiceProps {
    pub options: Vec<ChoiceProps>,

    /// Selected option values, in data model order
    pub selected: Vec<String>,
    pub multi_select: bool,
    pub binding: Option<String>,
}

/// A bound action, ready to fire.
///
/// Carries everything needed to report the action: the host callback, the
/// declared context and the data scope the button was rendered in.
#[derive(Clone)]
pub struct Activation {
    pub name: String,
    pub context: Vec<ActionContextItem>,
    pub scope: Value,
    pub surface_id: String,
    pub component_id: String,
    on_action: ActionCallback,
}

impl Activation {
    pub fn new(
        action: &ActionDefinition,
        scope: &Value,
        surface_id: &str,
        component_id: &str,
        on_action: ActionCallback,
    ) -> Self {
        Activation {
            name: action.name.clone(),
            context: action.context.clone(),
            scope: scope.clone(),
            surface_id: surface_id.to_string(),
            component_id: component_id.to_string(),
            on_action,
        }
    }

    /// Invoke the host callback once, synchronously
    pub fn activate(&self) {
        log::debug!(
            "[A2UI] Action `{}` fired by `{}` on surface `{}`",
            self.name,
            self.component_id,
            self.surface_id
        );
        (self.on_action)(&self.name, &self.context);
    }

    /// Context descriptors resolved against the button's scope.
    ///
    /// Unresolvable entries map to `null`.
    pub fn resolved_context(&self) -> Map<String, Value> {
        self.context
            .iter()
            .filter(|item| !item.key.is_empty())
            .map(|item| {
                let value = item
                    .value
                    .resolve(&self.scope)
                    .map(|v| v.into_owned())
                    .unwrap_or(Value::Null);
                (item.key.clone(), value)
            })
            .collect()
    }

    /// The `userAction` message reporting this activation to the agent
    pub fn to_user_action(&self) -> UserAction {
        UserAction {
            surface_id: self.surface_id.clone(),
            action: UserActionPayload {
                name: self.name.clone(),
                context: self.resolved_context(),
            },
            component_id: Some(self.component_id.clone()),
        }
    }
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activation")
            .field("name", &self.name)
            .field("context", &self.context)
            .field("surface_id", &self.surface_id)
            .field("component_id", &self.component_id)
            .finish_non_exhaustive()
    }
}

/// Two activations are equal when they would report the same action.
impl PartialEq for Activation {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.context == other.context
            && self.scope == other.scope
            && self.surface_id == other.surface_id
            && self.component_id == other.component_id
    }
}
