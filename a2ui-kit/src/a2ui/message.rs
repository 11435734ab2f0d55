//! A2UI Protocol Message Types
//!
//! This module defines the Rust types for the A2UI protocol messages and the
//! lenient decoder that turns agent-produced JSON into them.
//!
//! Decoding is deliberately forgiving: a message missing its `surfaceId` is
//! dropped, but inside an otherwise valid message each component or data
//! entry is decoded on its own, so one bad entry never takes its siblings
//! down with it. Unknown component kinds are kept (they render as nothing)
//! and components whose properties cannot be read are kept as
//! [`ComponentType::Malformed`] so the failure shows up at render time.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::error::MessageError;
use super::value::{BoundValue, lenient};

/// Top-level A2UI message enum.
///
/// Each variant corresponds to one of the A2UI protocol message types.
/// Envelopes with a tag this crate does not know decode to
/// [`A2uiMessage::Unknown`] and are ignored by the processor.
#[derive(Debug, Clone, PartialEq)]
pub enum A2uiMessage {
    /// Set the root component (and styles) of a surface
    BeginRendering(BeginRendering),

    /// Add or replace components in the surface
    SurfaceUpdate(SurfaceUpdate),

    /// Update the data model
    DataModelUpdate(DataModelUpdate),

    /// User action event
    UserAction(UserAction),

    /// An envelope tag that is not part of the supported protocol
    Unknown { tag: String },
}

impl A2uiMessage {
    /// Get the surface ID this message applies to
    pub fn surface_id(&self) -> Option<&str> {
        match self {
            A2uiMessage::BeginRendering(m) => Some(&m.surface_id),
            A2uiMessage::SurfaceUpdate(m) => Some(&m.surface_id),
            A2uiMessage::DataModelUpdate(m) => Some(&m.surface_id),
            A2uiMessage::UserAction(m) => Some(&m.surface_id),
            A2uiMessage::Unknown { .. } => None,
        }
    }

    /// Decode one message envelope.
    ///
    /// The envelope is an object whose first recognised key selects the
    /// message type. Skipped sub-entries are logged, not returned.
    pub fn from_value(value: &Value) -> Result<Self, MessageError> {
        let envelope = value.as_object().ok_or(MessageError::NotAnObject)?;

        for (tag, body) in envelope {
            let message = match tag.as_str() {
                "beginRendering" => A2uiMessage::BeginRendering(BeginRendering::from_body(body)?),
                "surfaceUpdate" => A2uiMessage::SurfaceUpdate(SurfaceUpdate::from_body(body)?),
                "dataModelUpdate" => {
                    A2uiMessage::DataModelUpdate(DataModelUpdate::from_body(body)?)
                }
                "userAction" => A2uiMessage::UserAction(UserAction::from_body(body)?),
                _ => continue,
            };
            return Ok(message);
        }

        let tag = envelope.keys().next().cloned().unwrap_or_default();
        Ok(A2uiMessage::Unknown { tag })
    }
}

impl<'de> Deserialize<'de> for A2uiMessage {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(d)?;
        A2uiMessage::from_value(&value).map_err(serde::de::Error::custom)
    }
}

fn body_object<'a>(tag: &str, body: &'a Value) -> Result<&'a Map<String, Value>, MessageError> {
    body.as_object().ok_or_else(|| MessageError::BodyNotAnObject {
        tag: tag.to_string(),
    })
}

fn surface_id_of(tag: &str, body: &Map<String, Value>) -> Result<String, MessageError> {
    body.get("surfaceId")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| MessageError::MissingSurfaceId {
            tag: tag.to_string(),
        })
}

/// Decode a list field entry by entry, logging and skipping the bad ones.
fn decode_entries<T>(
    tag: &str,
    field: &str,
    body: &Map<String, Value>,
    decode: impl Fn(&Value) -> Result<T, MessageError>,
) -> Vec<T> {
    let Some(items) = body.get(field).and_then(Value::as_array) else {
        if body.contains_key(field) {
            log::warn!("[A2UI] `{}.{}` is not an array, ignoring it", tag, field);
        }
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match decode(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("[A2UI] Skipping {}.{}[{}]: {}", tag, field, i, e);
                None
            }
        })
        .collect()
}

/// Set the root of a surface.
///
/// # Example JSON
///
/// ```text
/// {
///   "beginRendering": {
///     "surfaceId": "main",
///     "root": "root-column",
///     "styles": {"primaryColor": "#007BFF", "font": "Roboto"}
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BeginRendering {
    pub surface_id: String,

    /// `None` when the agent sent no usable root; the surface keeps its old one
    pub root: Option<String>,

    pub styles: Option<SurfaceStyles>,
}

impl BeginRendering {
    fn from_body(body: &Value) -> Result<Self, MessageError> {
        const TAG: &str = "beginRendering";
        let body = body_object(TAG, body)?;
        let surface_id = surface_id_of(TAG, body)?;

        let root = match body.get("root") {
            Some(Value::String(root)) => Some(root.clone()),
            Some(other) => {
                log::warn!("[A2UI] Ignoring non-string root {} for surface `{}`", other, surface_id);
                None
            }
            None => None,
        };
        let styles = body
            .get("styles")
            .and_then(|v| serde_json::from_value::<SurfaceStyles>(v.clone()).ok());

        Ok(BeginRendering {
            surface_id,
            root,
            styles,
        })
    }
}

/// Style hints for a surface
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurfaceStyles {
    /// Primary color (hex format)
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,

    /// Font family name
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

/// Add or replace components in the surface.
///
/// # Example JSON
///
/// ```text
/// {
///   "surfaceUpdate": {
///     "surfaceId": "main",
///     "components": [
///       {
///         "id": "root",
///         "component": {
///           "Column": {"children": {"explicitList": ["header", "content"]}}
///         }
///       }
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceUpdate {
    pub surface_id: String,
    pub components: Vec<ComponentDefinition>,
}

impl SurfaceUpdate {
    fn from_body(body: &Value) -> Result<Self, MessageError> {
        const TAG: &str = "surfaceUpdate";
        let body = body_object(TAG, body)?;
        let surface_id = surface_id_of(TAG, body)?;
        let components = decode_entries(TAG, "components", body, ComponentDefinition::from_value);

        Ok(SurfaceUpdate {
            surface_id,
            components,
        })
    }
}

/// A single component definition in the adjacency list.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDefinition {
    /// Unique component ID within its surface
    pub id: String,

    /// Flex weight; carried along but not used for resolution
    pub weight: Option<f64>,

    pub component: ComponentType,
}

impl ComponentDefinition {
    pub fn new(id: impl Into<String>, component: ComponentType) -> Self {
        ComponentDefinition {
            id: id.into(),
            weight: None,
            component,
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, MessageError> {
        let entry = value.as_object().ok_or(MessageError::MissingComponentId)?;
        let id = entry
            .get("id")
            .and_then(Value::as_str)
            .ok_or(MessageError::MissingComponentId)?;
        let body = entry
            .get("component")
            .and_then(Value::as_object)
            .filter(|body| !body.is_empty())
            .ok_or_else(|| MessageError::MissingComponentBody { id: id.to_string() })?;

        Ok(ComponentDefinition {
            id: id.to_string(),
            weight: entry.get("weight").and_then(Value::as_f64),
            component: ComponentType::from_body(body),
        })
    }
}

/// Component kinds with a dedicated variant.
pub const KNOWN_KINDS: &[&str] = &[
    "Text",
    "Button",
    "Column",
    "Row",
    "Card",
    "List",
    "Image",
    "Icon",
    "Divider",
    "Spacer",
    "TextField",
    "CheckBox",
    "Slider",
    "MultipleChoice",
];

/// Component type enum - one variant per supported kind plus two catch-alls.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentType {
    // Layout components
    Column(ColumnComponent),
    Row(RowComponent),
    List(ListComponent),
    Card(CardComponent),

    // Display components
    Text(TextComponent),
    Image(ImageComponent),
    Icon(IconComponent),
    Divider(DividerComponent),
    Spacer(SpacerComponent),

    // Interactive components
    Button(ButtonComponent),
    TextField(TextFieldComponent),
    CheckBox(CheckBoxComponent),
    Slider(SliderComponent),
    MultipleChoice(MultipleChoiceComponent),

    /// A kind this renderer does not support; renders as nothing
    Unknown { kind: String, properties: Value },

    /// A supported kind whose properties could not be read
    Malformed { kind: String, reason: String },
}

impl ComponentType {
    /// Pick the variant from the component body.
    ///
    /// The first recognised kind key wins; a body with no recognised key
    /// becomes `Unknown` under its first key.
    pub fn from_body(body: &Map<String, Value>) -> Self {
        let selected = body
            .iter()
            .find(|(kind, _)| KNOWN_KINDS.contains(&kind.as_str()))
            .or_else(|| body.iter().next());
        let Some((kind, props)) = selected else {
            return ComponentType::Malformed {
                kind: String::new(),
                reason: "component body names no kind".to_string(),
            };
        };
        if body.len() > 1 {
            log::debug!(
                "[A2UI] Component body has {} kind keys, using `{}`",
                body.len(),
                kind
            );
        }

        let decoded = match kind.as_str() {
            "Text" => decode_props(props).map(ComponentType::Text),
            "Button" => decode_props(props).map(ComponentType::Button),
            "Column" => decode_props(props).map(ComponentType::Column),
            "Row" => decode_props(props).map(ComponentType::Row),
            "Card" => decode_props(props).map(ComponentType::Card),
            "List" => decode_props(props).map(ComponentType::List),
            "Image" => decode_props(props).map(ComponentType::Image),
            "Icon" => decode_props(props).map(ComponentType::Icon),
            "Divider" => decode_props(props).map(ComponentType::Divider),
            "Spacer" => decode_props(props).map(ComponentType::Spacer),
            "TextField" => decode_props(props).map(ComponentType::TextField),
            "CheckBox" => decode_props(props).map(ComponentType::CheckBox),
            "Slider" => decode_props(props).map(ComponentType::Slider),
            "MultipleChoice" => decode_props(props).map(ComponentType::MultipleChoice),
            _ => {
                return ComponentType::Unknown {
                    kind: kind.clone(),
                    properties: props.clone(),
                };
            }
        };

        decoded.unwrap_or_else(|reason| ComponentType::Malformed {
            kind: kind.clone(),
            reason,
        })
    }

    /// The protocol name of this component's kind
    pub fn kind_name(&self) -> &str {
        match self {
            ComponentType::Column(_) => "Column",
            ComponentType::Row(_) => "Row",
            ComponentType::List(_) => "List",
            ComponentType::Card(_) => "Card",
            ComponentType::Text(_) => "Text",
            ComponentType::Image(_) => "Image",
            ComponentType::Icon(_) => "Icon",
            ComponentType::Divider(_) => "Divider",
            ComponentType::Spacer(_) => "Spacer",
            ComponentType::Button(_) => "Button",
            ComponentType::TextField(_) => "TextField",
            ComponentType::CheckBox(_) => "CheckBox",
            ComponentType::Slider(_) => "Slider",
            ComponentType::MultipleChoice(_) => "MultipleChoice",
            ComponentType::Unknown { kind, .. } | ComponentType::Malformed { kind, .. } => kind,
        }
    }
}

/// `null` props mean "all defaults"; anything but an object is malformed.
fn decode_props<T: DeserializeOwned + Default>(props: &Value) -> Result<T, String> {
    match props {
        Value::Null => Ok(T::default()),
        Value::Object(_) => serde_json::from_value(props.clone()).map_err(|e| e.to_string()),
        other => Err(format!("expected an object, found {}", other)),
    }
}

/// Children reference - either explicit list or template-based
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChildrenRef {
    /// Explicit list of child component IDs
    ExplicitList(Vec<String>),

    /// Template-based children bound to a data collection
    Template {
        #[serde(rename = "componentId")]
        component_id: String,
        #[serde(rename = "dataBinding")]
        data_binding: String,
    },
}

impl Default for ChildrenRef {
    fn default() -> Self {
        ChildrenRef::ExplicitList(vec![])
    }
}

// ============================================================================
// Layout Components
// ============================================================================

/// Vertical layout container
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnComponent {
    #[serde(deserialize_with = "lenient")]
    pub children: Option<ChildrenRef>,

    /// Cross-axis alignment
    #[serde(deserialize_with = "lenient")]
    pub alignment: Option<Alignment>,
}

/// Horizontal layout container
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RowComponent {
    #[serde(deserialize_with = "lenient")]
    pub children: Option<ChildrenRef>,

    /// Main-axis distribution
    #[serde(deserialize_with = "lenient")]
    pub distribution: Option<Distribution>,
}

/// Data-driven list container
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListComponent {
    #[serde(deserialize_with = "lenient")]
    pub children: Option<ChildrenRef>,

    #[serde(deserialize_with = "lenient")]
    pub direction: Option<ListDirection>,
}

/// Card container around at most one child
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardComponent {
    #[serde(deserialize_with = "lenient")]
    pub child: Option<String>,
}

// ============================================================================
// Display Components
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextComponent {
    /// Text content (literal or path-bound)
    pub text: BoundValue,

    /// Usage hint for styling (h1..h4, body, caption)
    #[serde(deserialize_with = "lenient")]
    pub usage_hint: Option<TextUsageHint>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageComponent {
    /// Image URL (literal or path-bound)
    pub url: BoundValue,

    #[serde(deserialize_with = "lenient")]
    pub fit: Option<ImageFit>,

    #[serde(deserialize_with = "lenient")]
    pub usage_hint: Option<ImageUsageHint>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IconComponent {
    /// Icon name (literal or path-bound), e.g. "settings"
    #[serde(alias = "name")]
    pub icon: BoundValue,

    #[serde(deserialize_with = "lenient")]
    pub size: Option<IconSize>,
}

/// Visual divider/separator
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DividerComponent {
    #[serde(deserialize_with = "lenient")]
    pub orientation: Option<Orientation>,
}

/// Fixed blank space
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpacerComponent {
    #[serde(deserialize_with = "lenient")]
    pub size: Option<SpacerSize>,
}

// ============================================================================
// Interactive Components
// ============================================================================

/// Clickable button component
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonComponent {
    /// Child component ID; a `Text` child supplies the label
    #[serde(deserialize_with = "lenient")]
    pub child: Option<String>,

    /// Whether this is a primary action
    #[serde(deserialize_with = "lenient")]
    pub primary: Option<bool>,

    /// Action to trigger on click
    #[serde(deserialize_with = "lenient")]
    pub action: Option<ActionDefinition>,
}

/// Text input; a path-bound `text` is written back as the user types
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextFieldComponent {
    #[serde(alias = "value")]
    pub text: BoundValue,

    #[serde(deserialize_with = "lenient")]
    pub label: Option<BoundValue>,

    #[serde(deserialize_with = "lenient")]
    pub placeholder: Option<BoundValue>,

    #[serde(deserialize_with = "lenient")]
    pub input_type: Option<TextInputType>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckBoxComponent {
    /// Checked state (literal or path-bound)
    pub value: BoundValue,

    #[serde(deserialize_with = "lenient")]
    pub label: Option<BoundValue>,
}

/// Numeric input over a range, 0 to 100 unless given
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SliderComponent {
    pub value: BoundValue,

    #[serde(alias = "minValue", deserialize_with = "lenient")]
    pub min: Option<f64>,

    #[serde(alias = "maxValue", deserialize_with = "lenient")]
    pub max: Option<f64>,

    #[serde(deserialize_with = "lenient")]
    pub step: Option<f64>,
}

/// Pick one or more of a fixed set of options
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultipleChoiceComponent {
    /// Selected option value(s)
    #[serde(alias = "selections")]
    pub value: BoundValue,

    #[serde(deserialize_with = "lenient_options")]
    pub options: Vec<ChoiceOption>,

    #[serde(deserialize_with = "lenient")]
    pub multi_select: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChoiceOption {
    pub value: String,
    pub label: BoundValue,
}

/// Options that fail to decode or carry no value are dropped.
fn lenient_options<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<ChoiceOption>, D::Error> {
    let items = match Option::<Value>::deserialize(d)? {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<ChoiceOption>(item).ok())
        .filter(|option| !option.value.is_empty())
        .collect())
}

// ============================================================================
// Enums
// ============================================================================

/// Column cross-axis alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
}

/// Row main-axis distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Distribution {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
    SpaceAround,
}

/// List scroll direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListDirection {
    #[default]
    Vertical,
    Horizontal,
}

/// Text usage hints for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextUsageHint {
    H1,
    H2,
    H3,
    H4,
    Caption,
    #[default]
    Body,
}

/// Image fit modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageFit {
    #[default]
    Contain,
    Cover,
    Fill,
    None,
    ScaleDown,
}

/// Image usage hints for sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageUsageHint {
    Icon,
    Avatar,
    SmallFeature,
    #[default]
    MediumFeature,
    LargeFeature,
    Header,
}

/// Icon glyphs a host is expected to provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IconName {
    AccountCircle,
    Add,
    ArrowBack,
    ArrowForward,
    Check,
    Close,
    Delete,
    Download,
    Edit,
    Error,
    Favorite,
    File,
    Folder,
    #[default]
    Help,
    Home,
    Info,
    Mail,
    Menu,
    Refresh,
    Search,
    Send,
    Settings,
    Share,
    Star,
    Upload,
    Warning,
}

impl IconName {
    /// Parse a protocol icon name; `None` for names outside the set.
    pub fn parse(name: &str) -> Option<Self> {
        serde_json::from_value(Value::String(name.to_string())).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IconSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// Keyboard and masking hint for text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextInputType {
    #[default]
    Text,
    Email,
    Password,
    Number,
    Tel,
    Url,
}

/// Orientation for dividers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpacerSize {
    Small,
    #[default]
    Medium,
    Large,
}

// ============================================================================
// Action & Data Model
// ============================================================================

/// Action definition for interactive components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    /// Action name (e.g., "addToCart", "submit")
    pub name: String,

    /// Context values to include with the action
    #[serde(default, deserialize_with = "lenient_context")]
    pub context: Vec<ActionContextItem>,
}

/// A single context item for an action.
///
/// LLMs sometimes generate malformed context items (e.g. `{"path": "/x"}`
/// instead of `{"key": "x", "value": {"path": "/x"}}`). Fields are
/// defaulted to make deserialization lenient.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionContextItem {
    pub key: String,

    /// Value (literal or path-bound)
    pub value: BoundValue,
}

fn lenient_context<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<ActionContextItem>, D::Error> {
    let items = match Option::<Value>::deserialize(d)? {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Update the data model.
///
/// # Example JSON
///
/// ```text
/// {
///   "dataModelUpdate": {
///     "surfaceId": "main",
///     "path": "/",
///     "contents": [
///       {"key": "title", "valueString": "Inbox"},
///       {"key": "files", "valueMap": [{"key": "name", "valueString": "a.txt"}]}
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataModelUpdate {
    pub surface_id: String,

    /// Base path for the entries (default "/")
    pub path: String,

    pub contents: Vec<DataEntry>,
}

impl DataModelUpdate {
    fn from_body(body: &Value) -> Result<Self, MessageError> {
        const TAG: &str = "dataModelUpdate";
        let body = body_object(TAG, body)?;
        let surface_id = surface_id_of(TAG, body)?;
        let path = body
            .get("path")
            .and_then(Value::as_str)
            .unwrap_or("/")
            .to_string();
        let contents = decode_entries(TAG, "contents", body, DataEntry::from_value);

        Ok(DataModelUpdate {
            surface_id,
            path,
            contents,
        })
    }
}

/// A single keyed data entry
#[derive(Debug, Clone, PartialEq)]
pub struct DataEntry {
    pub key: String,
    pub value: DataValue,
}

impl DataEntry {
    pub fn from_value(value: &Value) -> Result<Self, MessageError> {
        let entry = value.as_object().ok_or(MessageError::MissingDataKey)?;
        let key = entry
            .get("key")
            .and_then(Value::as_str)
            .filter(|key| !key.is_empty())
            .ok_or(MessageError::MissingDataKey)?;
        let value = DataValue::from_object(entry)
            .ok_or_else(|| MessageError::MissingDataValue { key: key.to_string() })?;

        Ok(DataEntry {
            key: key.to_string(),
            value,
        })
    }
}

/// Data value types
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    ValueString(String),
    ValueNumber(f64),
    ValueBoolean(bool),
    /// Ordered keyed entries
    ValueMap(Vec<DataEntry>),
    ValueArray(Vec<DataValue>),
}

impl DataValue {
    /// Read the typed value out of an entry object.
    ///
    /// Nested entries that fail to decode are dropped.
    pub fn from_object(entry: &Map<String, Value>) -> Option<Self> {
        if let Some(s) = entry.get("valueString").and_then(Value::as_str) {
            return Some(DataValue::ValueString(s.to_string()));
        }
        if let Some(n) = entry.get("valueNumber").and_then(Value::as_f64) {
            return Some(DataValue::ValueNumber(n));
        }
        if let Some(b) = entry.get("valueBoolean").and_then(Value::as_bool) {
            return Some(DataValue::ValueBoolean(b));
        }
        if let Some(items) = entry.get("valueMap").and_then(Value::as_array) {
            let entries = items
                .iter()
                .filter_map(|item| DataEntry::from_value(item).ok())
                .collect();
            return Some(DataValue::ValueMap(entries));
        }
        if let Some(items) = entry.get("valueArray").and_then(Value::as_array) {
            let values = items
                .iter()
                .filter_map(|item| item.as_object().and_then(DataValue::from_object))
                .collect();
            return Some(DataValue::ValueArray(values));
        }
        None
    }

    /// Materialize into the JSON stored in the data model.
    ///
    /// A `valueMap` becomes an ordered array of one-entry objects, so
    /// repeated keys and their order survive.
    pub fn to_json(&self) -> Value {
        match self {
            DataValue::ValueString(s) => Value::String(s.clone()),
            DataValue::ValueNumber(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            DataValue::ValueBoolean(b) => Value::Bool(*b),
            DataValue::ValueMap(entries) => Value::Array(
                entries
                    .iter()
                    .map(|entry| {
                        let mut pair = Map::new();
                        pair.insert(entry.key.clone(), entry.value.to_json());
                        Value::Object(pair)
                    })
                    .collect(),
            ),
            DataValue::ValueArray(items) => {
                Value::Array(items.iter().map(DataValue::to_json).collect())
            }
        }
    }
}

/// User action event, sent from client to agent (and queued when received)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAction {
    /// Source surface ID
    pub surface_id: String,

    /// Action details
    pub action: UserActionPayload,

    /// Source component ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
}

impl UserAction {
    fn from_body(body: &Value) -> Result<Self, MessageError> {
        const TAG: &str = "userAction";
        let object = body_object(TAG, body)?;
        surface_id_of(TAG, object)?;
        serde_json::from_value(body.clone()).map_err(|e| MessageError::InvalidField {
            field: "userAction",
            reason: e.to_string(),
        })
    }

    /// Wrap into the outbound `{"userAction": {...}}` envelope
    pub fn to_envelope(&self) -> Value {
        let mut envelope = Map::new();
        envelope.insert(
            "userAction".to_string(),
            serde_json::to_value(self).unwrap_or(Value::Null),
        );
        Value::Object(envelope)
    }
}

/// User action payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActionPayload {
    /// Action name
    pub name: String,

    /// Context values (resolved from data model)
    #[serde(default)]
    pub context: Map<String, Value>,
}
