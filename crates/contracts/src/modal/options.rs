use serde::{Deserialize, Deserializer, Serialize};

/// Panel size of a modal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalSize {
    #[serde(rename = "sm")]
    Sm,
    #[default]
    #[serde(rename = "md")]
    Md,
    #[serde(rename = "lg")]
    Lg,
    #[serde(rename = "full")]
    Full,
}

impl ModalSize {
    pub fn code(&self) -> &'static str {
        match self {
            ModalSize::Sm => "sm",
            ModalSize::Md => "md",
            ModalSize::Lg => "lg",
            ModalSize::Full => "full",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "sm" => Some(ModalSize::Sm),
            "md" => Some(ModalSize::Md),
            "lg" => Some(ModalSize::Lg),
            "full" => Some(ModalSize::Full),
            _ => None,
        }
    }

    pub fn all() -> Vec<ModalSize> {
        vec![ModalSize::Sm, ModalSize::Md, ModalSize::Lg, ModalSize::Full]
    }

    /// Modifier class for the panel (`modal--md`).
    pub fn css_modifier(&self) -> String {
        format!("modal--{}", self.code())
    }
}

/// Layer rendered behind the panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackdropType {
    #[default]
    Dimmed,
    Blur,
    None,
}

impl BackdropType {
    pub fn code(&self) -> &'static str {
        match self {
            BackdropType::Dimmed => "dimmed",
            BackdropType::Blur => "blur",
            BackdropType::None => "none",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "dimmed" => Some(BackdropType::Dimmed),
            "blur" => Some(BackdropType::Blur),
            "none" => Some(BackdropType::None),
            _ => None,
        }
    }

    /// Modifier class for the overlay (`modal-overlay--dimmed`).
    pub fn css_modifier(&self) -> String {
        format!("modal-overlay--{}", self.code())
    }
}

/// Chrome options where every field may be left unset.
///
/// Used both for per-call overrides and for manager-wide defaults; unset
/// fields fall through to the next layer (see [`ModalOptions::merged_over`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModalOptions {
    pub title: Option<String>,
    pub size: Option<ModalSize>,
    pub backdrop_type: Option<BackdropType>,
    pub close_on_outside_click: Option<bool>,
    pub close_on_esc: Option<bool>,
    pub show_close_button: Option<bool>,
    pub content_padding: Option<bool>,
    pub show_footer: Option<bool>,
    /// Accepts `"a b"` as well as `["a", "b"]`.
    #[serde(deserialize_with = "class_list")]
    pub panel_class: Option<Vec<String>>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub restore_focus: Option<bool>,
}

fn class_list<'de, De>(deserializer: De) -> Result<Option<Vec<String>>, De::Error>
where
    De: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(Option::<OneOrMany>::deserialize(deserializer)?.map(|classes| match classes {
        OneOrMany::One(classes) => classes.split_whitespace().map(String::from).collect(),
        OneOrMany::Many(classes) => classes,
    }))
}

impl ModalOptions {
    /// Layer `self` over `defaults`: fields set here win.
    pub fn merged_over(&self, defaults: &ModalOptions) -> ModalOptions {
        ModalOptions {
            title: self.title.clone().or_else(|| defaults.title.clone()),
            size: self.size.or(defaults.size),
            backdrop_type: self.backdrop_type.or(defaults.backdrop_type),
            close_on_outside_click: self
                .close_on_outside_click
                .or(defaults.close_on_outside_click),
            close_on_esc: self.close_on_esc.or(defaults.close_on_esc),
            show_close_button: self.show_close_button.or(defaults.show_close_button),
            content_padding: self.content_padding.or(defaults.content_padding),
            show_footer: self.show_footer.or(defaults.show_footer),
            panel_class: self
                .panel_class
                .clone()
                .or_else(|| defaults.panel_class.clone()),
            width: self.width.clone().or_else(|| defaults.width.clone()),
            height: self.height.clone().or_else(|| defaults.height.clone()),
            restore_focus: self.restore_focus.or(defaults.restore_focus),
        }
    }

    /// Fill whatever is still unset with the built-in defaults.
    pub fn resolve(&self) -> ChromeOptions {
        ChromeOptions {
            title: self.title.clone().unwrap_or_default(),
            size: self.size.unwrap_or_default(),
            backdrop_type: self.backdrop_type.unwrap_or_default(),
            close_on_outside_click: self.close_on_outside_click.unwrap_or(true),
            close_on_esc: self.close_on_esc.unwrap_or(true),
            show_close_button: self.show_close_button.unwrap_or(true),
            content_padding: self.content_padding.unwrap_or(true),
            show_footer: self.show_footer.unwrap_or(false),
            panel_class: self.panel_class.clone().unwrap_or_default(),
            width: self.width.clone(),
            height: self.height.clone(),
            restore_focus: self.restore_focus.unwrap_or(true),
        }
    }
}

/// Per-call configuration for `open`: chrome overrides plus the data payload
/// injected into the content unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalConfig<D = serde_json::Value> {
    #[serde(flatten)]
    pub options: ModalOptions,
    #[serde(default = "Option::default")]
    pub data: Option<D>,
}

impl<D> Default for ModalConfig<D> {
    fn default() -> Self {
        Self {
            options: ModalOptions::default(),
            data: None,
        }
    }
}

impl<D> ModalConfig<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.options.title = Some(title.into());
        self
    }

    pub fn size(mut self, size: ModalSize) -> Self {
        self.options.size = Some(size);
        self
    }

    pub fn backdrop(mut self, backdrop: BackdropType) -> Self {
        self.options.backdrop_type = Some(backdrop);
        self
    }

    pub fn close_on_outside_click(mut self, value: bool) -> Self {
        self.options.close_on_outside_click = Some(value);
        self
    }

    pub fn close_on_esc(mut self, value: bool) -> Self {
        self.options.close_on_esc = Some(value);
        self
    }

    pub fn show_close_button(mut self, value: bool) -> Self {
        self.options.show_close_button = Some(value);
        self
    }

    pub fn content_padding(mut self, value: bool) -> Self {
        self.options.content_padding = Some(value);
        self
    }

    pub fn show_footer(mut self, value: bool) -> Self {
        self.options.show_footer = Some(value);
        self
    }

    pub fn panel_class(mut self, class: impl Into<String>) -> Self {
        self.options
            .panel_class
            .get_or_insert_with(Vec::new)
            .push(class.into());
        self
    }

    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.options.width = Some(width.into());
        self
    }

    pub fn height(mut self, height: impl Into<String>) -> Self {
        self.options.height = Some(height.into());
        self
    }

    pub fn restore_focus(mut self, value: bool) -> Self {
        self.options.restore_focus = Some(value);
        self
    }

    pub fn data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }

    /// Split into the chrome part and the payload.
    pub fn into_parts(self) -> (ModalOptions, Option<D>) {
        (self.options, self.data)
    }
}

/// Fully resolved chrome settings handed to the overlay host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromeOptions {
    pub title: String,
    pub size: ModalSize,
    pub backdrop_type: BackdropType,
    pub close_on_outside_click: bool,
    pub close_on_esc: bool,
    pub show_close_button: bool,
    pub content_padding: bool,
    pub show_footer: bool,
    pub panel_class: Vec<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub restore_focus: bool,
}

impl Default for ChromeOptions {
    fn default() -> Self {
        ModalOptions::default().resolve()
    }
}

impl ChromeOptions {
    pub fn has_header(&self) -> bool {
        !self.title.is_empty() || self.show_close_button
    }

    pub fn overlay_class(&self) -> String {
        format!("modal-overlay {}", self.backdrop_type.css_modifier())
    }

    pub fn panel_class(&self) -> String {
        let mut classes = vec!["modal".to_string(), self.size.css_modifier()];
        classes.extend(self.panel_class.iter().filter(|c| !c.is_empty()).cloned());
        classes.join(" ")
    }

    pub fn panel_style(&self) -> String {
        let mut style = String::from("position: relative;");
        if let Some(width) = &self.width {
            style.push_str(&format!(" width: {};", width));
        }
        if let Some(height) = &self.height {
            style.push_str(&format!(" height: {};", height));
        }
        style
    }

    pub fn body_class(&self) -> &'static str {
        if self.content_padding {
            "modal-body"
        } else {
            "modal-body modal-body--flush"
        }
    }
}
