//! Component resolution.
//!
//! Turns a component id into a host node by looking the definition up in the
//! surface registry, resolving its bound properties against the current data
//! scope and recursing into its children.
//!
//! Every component is an isolation boundary: a primitive error, a panic, a
//! reference cycle or runaway nesting is replaced by an error node at that
//! component while its siblings and ancestors render normally. A pass also
//! stops rendering components once its node budget is spent, which bounds
//! trees that fan out without cycling.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;

use super::{
    config::DEFAULT_MAX_NODES,
    error::RenderError,
    message::*,
    primitives::*,
    registry::{ComponentIndex, ComponentRegistry},
    template::{expand_scoped, expand_synthetic},
    value::{BoundValue, join_path, resolve_bool, resolve_number, resolve_strings, resolve_text},
};

/// What a component sees while it renders.
///
/// Template expansion derives one context per item with a narrowed
/// `data_model`; everything else is inherited unchanged.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub surface_id: &'a str,
    pub components: &'a ComponentRegistry,

    /// The data scope bindings resolve against
    pub data_model: &'a Value,

    /// Absolute path of `data_model` within the surface's data, `/` at the root
    pub scope_path: &'a str,

    pub on_action: &'a ActionCallback,
}

impl<'a> RenderContext<'a> {
    /// Same context, bindings scoped to `data_model` found at `scope_path`
    pub fn scoped<'b>(&self, data_model: &'b Value, scope_path: &'b str) -> RenderContext<'b>
    where
        'a: 'b,
    {
        RenderContext {
            surface_id: self.surface_id,
            components: self.components,
            data_model,
            scope_path,
            on_action: self.on_action,
        }
    }

    /// Absolute data path a path-bound value writes back to
    fn binding(&self, value: &BoundValue) -> Option<String> {
        if value.is_literal() {
            return None;
        }
        value.as_path().map(|path| join_path(self.scope_path, path))
    }
}

/// Walks a component tree into host nodes.
pub struct ComponentResolver<'p, P: RenderPrimitives> {
    primitives: &'p mut P,
    max_depth: usize,
    max_nodes: usize,

    /// Components rendered so far in this pass
    rendered: usize,

    /// Components being rendered above the current one, with the address of
    /// the scope each was rendered in
    ancestry: Vec<(ComponentIndex, usize)>,
}

impl<'p, P: RenderPrimitives> ComponentResolver<'p, P> {
    pub fn new(primitives: &'p mut P, max_depth: usize) -> Self {
        ComponentResolver {
            primitives,
            max_depth,
            max_nodes: DEFAULT_MAX_NODES,
            rendered: 0,
            ancestry: Vec::new(),
        }
    }

    /// Cap the components rendered by this resolver; later ones render as errors
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Resolve the component `id` in `ctx`.
    ///
    /// Returns `None` for components of an unsupported kind, which render as
    /// nothing. Missing ids render the host's not-found node.
    pub fn resolve(&mut self, id: &str, ctx: RenderContext<'_>) -> Option<P::Node> {
        let Some((index, definition)) = ctx.components.get_full(id) else {
            log::debug!("[A2UI] Component `{}` is not registered", id);
            return Some(self.primitives.not_found(id));
        };

        if self.rendered >= self.max_nodes {
            let error = RenderError::BudgetExceeded {
                limit: self.max_nodes,
            };
            if self.rendered == self.max_nodes {
                self.rendered += 1;
                return Some(self.fail(definition, error));
            }
            let kind = definition.component.kind_name();
            return Some(self.primitives.error(kind, &error.to_string()));
        }
        self.rendered += 1;

        let scope = ctx.data_model as *const Value as usize;
        if self.ancestry.contains(&(index, scope)) {
            let error = RenderError::Cycle { id: id.to_string() };
            return Some(self.fail(definition, error));
        }
        if self.ancestry.len() >= self.max_depth {
            let error = RenderError::DepthExceeded {
                limit: self.max_depth,
            };
            return Some(self.fail(definition, error));
        }

        let depth = self.ancestry.len();
        self.ancestry.push((index, scope));
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(definition, ctx)));
        self.ancestry.truncate(depth);

        let result = outcome.unwrap_or_else(|payload| {
            Err(RenderError::Panicked(panic_message(payload.as_ref())))
        });
        match result {
            Ok(node) => node,
            Err(error) => Some(self.fail(definition, error)),
        }
    }

    fn fail(&mut self, definition: &ComponentDefinition, error: RenderError) -> P::Node {
        let kind = definition.component.kind_name();
        log::warn!(
            "[A2UI] Failed to render {} `{}`: {}",
            kind,
            definition.id,
            error
        );
        self.primitives.error(kind, &error.to_string())
    }

    fn dispatch(
        &mut self,
        definition: &ComponentDefinition,
        ctx: RenderContext<'_>,
    ) -> Result<Option<P::Node>, RenderError> {
        let data = ctx.data_model;

        let node = match &definition.component {
            ComponentType::Text(text) => self.primitives.text(TextProps {
                text: resolve_text(&text.text, data),
                usage_hint: text.usage_hint.unwrap_or_default(),
            })?,
            ComponentType::Button(button) => {
                let props = ButtonProps {
                    label: button_label(button, ctx),
                    primary: button.primary.unwrap_or(false),
                    action: button.action.as_ref().map(|action| {
                        Activation::new(
                            action,
                            data,
                            ctx.surface_id,
                            &definition.id,
                            ctx.on_action.clone(),
                        )
                    }),
                };
                self.primitives.button(props)?
            }
            ComponentType::Column(column) => {
                let children = self.column_children(column.children.as_ref(), ctx);
                let props = ColumnProps {
                    alignment: column.alignment.unwrap_or_default(),
                };
                self.primitives.column(props, children)?
            }
            ComponentType::Row(row) => {
                let children = match &row.children {
                    Some(ChildrenRef::ExplicitList(ids)) => self.resolve_all(ids, ctx),
                    Some(ChildrenRef::Template { .. }) => {
                        log::debug!(
                            "[A2UI] Row `{}` only renders explicit children, ignoring its template",
                            definition.id
                        );
                        Vec::new()
                    }
                    None => Vec::new(),
                };
                let props = RowProps {
                    distribution: row.distribution.unwrap_or_default(),
                };
                self.primitives.row(props, children)?
            }
            ComponentType::List(list) => {
                let items = match &list.children {
                    Some(ChildrenRef::Template {
                        component_id,
                        data_binding,
                    }) => {
                        let collection = join_path(ctx.scope_path, data_binding);
                        expand_scoped(data_binding, data)
                            .into_iter()
                            .filter_map(|(key, item)| {
                                let item_path = join_path(&collection, &key);
                                self.resolve(component_id, ctx.scoped(item, &item_path))
                            })
                            .collect()
                    }
                    Some(ChildrenRef::ExplicitList(ids)) => self.resolve_all(ids, ctx),
                    None => Vec::new(),
                };
                let props = ListProps {
                    direction: list.direction.unwrap_or_default(),
                };
                self.primitives.list(props, items)?
            }
            ComponentType::Card(card) => {
                let child = card.child.as_deref().and_then(|id| self.resolve(id, ctx));
                self.primitives.card(child)?
            }
            ComponentType::Image(image) => self.primitives.image(ImageProps {
                url: resolve_text(&image.url, data),
                fit: image.fit.unwrap_or_default(),
                usage_hint: image.usage_hint.unwrap_or_default(),
            })?,
            ComponentType::Icon(icon) => {
                let name = resolve_text(&icon.icon, data);
                let glyph = IconName::parse(&name).unwrap_or_else(|| {
                    log::debug!("[A2UI] Unknown icon `{}`, using the default", name);
                    IconName::default()
                });
                self.primitives.icon(IconProps {
                    icon: glyph,
                    size: icon.size.unwrap_or_default(),
                })?
            }
            ComponentType::Divider(divider) => self.primitives.divider(DividerProps {
                orientation: divider.orientation.unwrap_or_default(),
            })?,
            ComponentType::Spacer(spacer) => self.primitives.spacer(SpacerProps {
                size: spacer.size.unwrap_or_default(),
            })?,
            ComponentType::TextField(field) => self.primitives.text_field(TextFieldProps {
                text: resolve_text(&field.text, data),
                label: resolve_optional_text(field.label.as_ref(), data),
                placeholder: resolve_optional_text(field.placeholder.as_ref(), data),
                input_type: field.input_type.unwrap_or_default(),
                binding: ctx.binding(&field.text),
            })?,
            ComponentType::CheckBox(check_box) => self.primitives.check_box(CheckBoxProps {
                checked: resolve_bool(&check_box.value, data),
                label: resolve_optional_text(check_box.label.as_ref(), data),
                binding: ctx.binding(&check_box.value),
            })?,
            ComponentType::Slider(slider) => self.primitives.slider(slider_props(slider, ctx))?,
            ComponentType::MultipleChoice(choice) => {
                let options = choice
                    .options
                    .iter()
                    .map(|option| ChoiceProps {
                        value: option.value.clone(),
                        label: match resolve_text(&option.label, data) {
                            label if label.is_empty() => option.value.clone(),
                            label => label,
                        },
                    })
                    .collect();
                let multi_select = choice.multi_select.unwrap_or(false);
                let mut selected = resolve_strings(&choice.value, data);
                if !multi_select {
                    selected.truncate(1);
                }
                self.primitives.multiple_choice(MultipleChoiceProps {
                    options,
                    selected,
                    multi_select,
                    binding: ctx.binding(&choice.value),
                })?
            }
            ComponentType::Unknown { kind, .. } => {
                log::debug!(
                    "[A2UI] Skipping component `{}` of unsupported kind `{}`",
                    definition.id,
                    kind
                );
                return Ok(None);
            }
            ComponentType::Malformed { kind, reason } => {
                return Err(RenderError::Malformed {
                    kind: kind.clone(),
                    reason: reason.clone(),
                });
            }
        };

        Ok(Some(node))
    }

    fn resolve_all(&mut self, ids: &[String], ctx: RenderContext<'_>) -> Vec<P::Node> {
        ids.iter().filter_map(|id| self.resolve(id, ctx)).collect()
    }

    /// Column templates expand to synthetic ids rendered in the same scope.
    /// Synthetic ids with no registered component are left out.
    fn column_children(
        &mut self,
        children: Option<&ChildrenRef>,
        ctx: RenderContext<'_>,
    ) -> Vec<P::Node> {
        match children {
            Some(ChildrenRef::ExplicitList(ids)) => self.resolve_all(ids, ctx),
            Some(ChildrenRef::Template {
                component_id,
                data_binding,
            }) => {
                let ids: Vec<String> = expand_synthetic(component_id, data_binding, ctx.data_model)
                    .into_iter()
                    .filter(|id| ctx.components.contains(id))
                    .collect();
                self.resolve_all(&ids, ctx)
            }
            None => Vec::new(),
        }
    }
}

/// A `Text` child supplies the label; anything else gets the generic one.
fn button_label(button: &ButtonComponent, ctx: RenderContext<'_>) -> String {
    let child = button
        .child
        .as_deref()
        .and_then(|id| ctx.components.get(id));
    match child.map(|definition| &definition.component) {
        Some(ComponentType::Text(text)) => resolve_text(&text.text, ctx.data_model),
        _ => "Button".to_string(),
    }
}

fn resolve_optional_text(value: Option<&BoundValue>, data: &Value) -> String {
    value.map(|value| resolve_text(value, data)).unwrap_or_default()
}

/// Range defaults to `0..=100`; an inverted range collapses onto `min`.
fn slider_props(slider: &SliderComponent, ctx: RenderContext<'_>) -> SliderProps {
    let min = slider.min.unwrap_or(0.0);
    let max = slider.max.unwrap_or(100.0).max(min);
    let value = resolve_number(&slider.value, ctx.data_model);
    let value = if value.is_finite() { value.clamp(min, max) } else { min };

    SliderProps {
        value,
        min,
        max,
        step: slider.step.filter(|step| *step > 0.0),
        binding: ctx.binding(&slider.value),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
