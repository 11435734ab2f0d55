//! Outline host.
//!
//! A renderer-agnostic node tree built from resolved components. It backs
//! the `a2ui-view` binary and doubles as the reference host in tests.

use std::fmt;

use super::error::RenderError;
use super::message::*;
use super::primitives::*;

/// One resolved node of a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum OutlineNode {
    Text {
        text: String,
        usage_hint: TextUsageHint,
    },
    Button {
        label: String,
        primary: bool,
        action: Option<Activation>,
    },
    Column {
        alignment: Alignment,
        children: Vec<OutlineNode>,
    },
    Row {
        distribution: Distribution,
        children: Vec<OutlineNode>,
    },
    List {
        direction: ListDirection,
        items: Vec<OutlineNode>,
    },
    Card {
        child: Option<Box<OutlineNode>>,
    },
    Image {
        url: String,
        fit: ImageFit,
        usage_hint: ImageUsageHint,
    },
    Icon {
        icon: IconName,
        size: IconSize,
    },
    Divider {
        orientation: Orientation,
    },
    Spacer {
        size: SpacerSize,
    },
    TextField {
        text: String,
        label: String,
        placeholder: String,
        input_type: TextInputType,
        binding: Option<String>,
    },
    CheckBox {
        checked: bool,
        label: String,
        binding: Option<String>,
    },
    Slider {
        value: f64,
        min: f64,
        max: f64,
        step: Option<f64>,
        binding: Option<String>,
    },
    MultipleChoice {
        options: Vec<ChoiceProps>,
        selected: Vec<String>,
        multi_select: bool,
        binding: Option<String>,
    },
    NotFound {
        component_id: String,
    },
    Error {
        kind: String,
        message: String,
    },
    Placeholder {
        surface_id: String,
    },
}

impl OutlineNode {
    /// Direct children; empty for leaves. A card's child counts.
    pub fn children(&self) -> &[OutlineNode] {
        match self {
            OutlineNode::Column { children, .. } | OutlineNode::Row { children, .. } => children,
            OutlineNode::List { items, .. } => items,
            OutlineNode::Card { child: Some(child) } => std::slice::from_ref(child.as_ref()),
            _ => &[],
        }
    }

    /// Text of every `Text` node in document order
    pub fn texts(&self) -> Vec<&str> {
        let mut texts = Vec::new();
        self.collect_texts(&mut texts);
        texts
    }

    fn collect_texts<'a>(&'a self, texts: &mut Vec<&'a str>) {
        if let OutlineNode::Text { text, .. } = self {
            texts.push(text);
        }
        for child in self.children() {
            child.collect_texts(texts);
        }
    }

    /// Every actionable button in document order
    pub fn activations(&self) -> Vec<&Activation> {
        let mut found = Vec::new();
        self.collect_activations(&mut found);
        found
    }

    fn collect_activations<'a>(&'a self, found: &mut Vec<&'a Activation>) {
        if let OutlineNode::Button {
            action: Some(activation),
            ..
        } = self
        {
            found.push(activation);
        }
        for child in self.children() {
            child.collect_activations(found);
        }
    }

    fn write_line(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutlineNode::Text { text, usage_hint } => {
                write!(f, "Text({}) {:?}", enum_name(usage_hint), text)
            }
            OutlineNode::Button {
                label,
                primary,
                action,
            } => {
                write!(f, "Button {:?}", label)?;
                if *primary {
                    write!(f, " (primary)")?;
                }
                if let Some(activation) = action {
                    write!(f, " -> {}", activation.name)?;
                }
                Ok(())
            }
            OutlineNode::Column { alignment, .. } => write!(f, "Column({})", enum_name(alignment)),
            OutlineNode::Row { distribution, .. } => write!(f, "Row({})", enum_name(distribution)),
            OutlineNode::List { direction, .. } => write!(f, "List({})", enum_name(direction)),
            OutlineNode::Card { .. } => write!(f, "Card"),
            OutlineNode::Image { url, fit, .. } => write!(f, "Image({}) {}", enum_name(fit), url),
            OutlineNode::Icon { icon, size } => {
                write!(f, "Icon({}) {}", enum_name(size), enum_name(icon))
            }
            OutlineNode::Divider { orientation } => write!(f, "Divider({})", enum_name(orientation)),
            OutlineNode::Spacer { size } => write!(f, "Spacer({})", enum_name(size)),
            OutlineNode::TextField {
                text,
                label,
                placeholder,
                input_type,
                binding,
            } => {
                write!(f, "TextField({}) {:?} = {:?}", enum_name(input_type), label, text)?;
                if text.is_empty() && !placeholder.is_empty() {
                    write!(f, " ({:?})", placeholder)?;
                }
                write_binding(f, binding)
            }
            OutlineNode::CheckBox {
                checked,
                label,
                binding,
            } => {
                let mark = if *checked { "x" } else { " " };
                write!(f, "CheckBox [{}] {:?}", mark, label)?;
                write_binding(f, binding)
            }
            OutlineNode::Slider {
                value,
                min,
                max,
                binding,
                ..
            } => {
                write!(f, "Slider {} in {}..={}", value, min, max)?;
                write_binding(f, binding)
            }
            OutlineNode::MultipleChoice {
                options,
                selected,
                multi_select,
                binding,
            } => {
                write!(f, "{}", if *multi_select { "MultipleChoice(many)" } else { "MultipleChoice(one)" })?;
                for option in options {
                    let mark = if selected.contains(&option.value) { "x" } else { " " };
                    write!(f, " [{}] {:?}", mark, option.label)?;
                }
                write_binding(f, binding)
            }
            OutlineNode::NotFound { component_id } => {
                write!(f, "[missing component `{}`]", component_id)
            }
            OutlineNode::Error { kind, message } => write!(f, "[{} error: {}]", kind, message),
            OutlineNode::Placeholder { surface_id } => {
                write!(f, "[surface `{}` has nothing to render yet]", surface_id)
            }
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}", "", indent = depth * 2)?;
        self.write_line(f)?;
        writeln!(f)?;
        for child in self.children() {
            child.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Indented tree, one node per line.
impl fmt::Display for OutlineNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

fn write_binding(f: &mut fmt::Formatter<'_>, binding: &Option<String>) -> fmt::Result {
    match binding {
        Some(path) => write!(f, " <-> {}", path),
        None => Ok(()),
    }
}

/// The protocol spelling of a unit enum value, e.g. `spaceBetween`.
fn enum_name<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => name,
        _ => String::from("?"),
    }
}

/// Primitives producing [`OutlineNode`]s. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct OutlinePrimitives;

impl RenderPrimitives for OutlinePrimitives {
    type Node = OutlineNode;

    fn text(&mut self, props: TextProps) -> Result<OutlineNode, RenderError> {
        Ok(OutlineNode::Text {
            text: props.text,
            usage_hint: props.usage_hint,
        })
    }

    fn button(&mut self, props: ButtonProps) -> Result<OutlineNode, RenderError> {
        Ok(OutlineNode::Button {
            label: props.label,
            primary: props.primary,
            action: props.action,
        })
    }

    fn column(
        &mut self,
        props: ColumnProps,
        children: Vec<OutlineNode>,
    ) -> Result<OutlineNode, RenderError> {
        Ok(OutlineNode::Column {
            alignment: props.alignment,
            children,
        })
    }

    fn row(&mut self, props: RowProps, children: Vec<OutlineNode>) -> Result<OutlineNode, RenderError> {
        Ok(OutlineNode::Row {
            distribution: props.distribution,
            children,
        })
    }

    fn list(&mut self, props: ListProps, items: Vec<OutlineNode>) -> Result<OutlineNode, RenderError> {
        Ok(OutlineNode::List {
            direction: props.direction,
            items,
        })
    }

    fn card(&mut self, child: Option<OutlineNode>) -> Result<OutlineNode, RenderError> {
        Ok(OutlineNode::Card {
            child: child.map(Box::new),
        })
    }

    fn image(&mut self, props: ImageProps) -> Result<OutlineNode, RenderError> {
        Ok(OutlineNode::Image {
            url: props.url,
            fit: props.fit,
            usage_hint: props.usage_hint,
        })
    }

    fn icon(&mut self, props: IconProps) -> Result<OutlineNode, RenderError> {
        Ok(OutlineNode::Icon {
            icon: props.icon,
            size: props.size,
        })
    }

    fn divider(&mut self, props: DividerProps) -> Result<OutlineNode, RenderError> {
        Ok(OutlineNode::Divider {
            orientation: props.orientation,
        })
    }

    fn spacer(&mut self, props: SpacerProps) -> Result<OutlineNode, RenderError> {
        Ok(OutlineNode::Spacer { size: props.size })
    }

    fn text_field(&mut self, props: TextFieldProps) -> Result<OutlineNode, RenderError> {
        Ok(OutlineNode::TextField {
            text: props.text,
            label: props.label,
            placeholder: props.placeholder,
            input_type: props.input_type,
            binding: props.binding,
        })
    }

    fn check_box(&mut self, props: CheckBoxProps) -> Result<OutlineNode, RenderError> {
        Ok(OutlineNode::CheckBox {
            checked: props.checked,
            label: props.label,
            binding: props.binding,
        })
    }

    fn slider(&mut self, props: SliderProps) -> Result<OutlineNode, RenderError> {
        Ok(OutlineNode::Slider {
            value: props.value,
            min: props.min,
            max: props.max,
            step: props.step,
            binding: props.binding,
        })
    }

    fn multiple_choice(&mut self, props: MultipleChoiceProps) -> Result<OutlineNode, RenderError> {
        Ok(OutlineNode::MultipleChoice {
            options: props.options,
            selected: props.selected,
            multi_select: props.multi_select,
            binding: props.binding,
        })
    }

    fn not_found(&mut self, component_id: &str) -> OutlineNode {
        OutlineNode::NotFound {
            component_id: component_id.to_string(),
        }
    }

    fn error(&mut self, kind: &str, message: &str) -> OutlineNode {
        OutlineNode::Error {
            kind: kind.to_string(),
            message: message.to_string(),
        }
    }

    fn surface_placeholder(&mut self, surface_id: &str) -> OutlineNode {
        OutlineNode::Placeholder {
            surface_id: surface_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_indents_children() {
        let node = OutlineNode::Column {
            alignment: Alignment::Center,
            children: vec![
                OutlineNode::Text {
                    text: "Hello".to_string(),
                    usage_hint: TextUsageHint::H1,
                },
                OutlineNode::Row {
                    distribution: Distribution::SpaceBetween,
                    children: vec![OutlineNode::NotFound {
                        component_id: "ghost".to_string(),
                    }],
                },
            ],
        };

        assert_eq!(
            node.to_string(),
            "Column(center)\n  Text(h1) \"Hello\"\n  Row(spaceBetween)\n    [missing component `ghost`]\n"
        );
    }

    #[test]
    fn test_display_inputs_with_bindings() {
        let form = OutlineNode::Column {
            alignment: Alignment::Start,
            children: vec![
                OutlineNode::TextField {
                    text: String::new(),
                    label: "Email".to_string(),
                    placeholder: "you@example.com".to_string(),
                    input_type: TextInputType::Email,
                    binding: Some("/email".to_string()),
                },
                OutlineNode::CheckBox {
                    checked: true,
                    label: "Subscribe".to_string(),
                    binding: None,
                },
                OutlineNode::Slider {
                    value: 3.0,
                    min: 0.0,
                    max: 10.0,
                    step: Some(1.0),
                    binding: Some("/volume".to_string()),
                },
                OutlineNode::MultipleChoice {
                    options: vec![
                        ChoiceProps {
                            value: "s".to_string(),
                            label: "Small".to_string(),
                        },
                        ChoiceProps {
                            value: "l".to_string(),
                            label: "Large".to_string(),
                        },
                    ],
                    selected: vec!["l".to_string()],
                    multi_select: false,
                    binding: Some("/size".to_string()),
                },
            ],
        };

        assert_eq!(
            form.to_string(),
            "Column(start)\n\
             \x20 TextField(email) \"Email\" = \"\" (\"you@example.com\") <-> /email\n\
             \x20 CheckBox [x] \"Subscribe\"\n\
             \x20 Slider 3 in 0..=10 <-> /volume\n\
             \x20 MultipleChoice(one) [ ] \"Small\" [x] \"Large\" <-> /size\n"
        );
    }

    #[test]
    fn test_card_child_is_walked() {
        let node = OutlineNode::Card {
            child: Some(Box::new(OutlineNode::Text {
                text: "inside".to_string(),
                usage_hint: TextUsageHint::Body,
            })),
        };
        assert_eq!(node.texts(), vec!["inside"]);
        assert!(OutlineNode::Card { child: None }.children().is_empty());
    }
}
