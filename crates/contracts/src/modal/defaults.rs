use super::options::ModalOptions;
use thiserror::Error;

/// Defaults compiled into the library.
pub const DEFAULT_MODAL_OPTIONS: &str = r#"
title = ""
size = "md"
backdropType = "dimmed"
closeOnOutsideClick = true
closeOnEsc = true
showCloseButton = true
contentPadding = true
showFooter = false
restoreFocus = true
"#;

#[derive(Debug, Error)]
pub enum ModalConfigError {
    #[error("invalid modal defaults: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Load the manager-wide default options.
///
/// `overrides` is an application-supplied TOML document; keys it sets win over
/// the embedded [`DEFAULT_MODAL_OPTIONS`].
pub fn load_default_options(overrides: Option<&str>) -> Result<ModalOptions, ModalConfigError> {
    let embedded: ModalOptions = toml::from_str(DEFAULT_MODAL_OPTIONS)?;

    match overrides {
        Some(source) => {
            let custom: ModalOptions = toml::from_str(source)?;
            log::info!("Using application modal defaults");
            Ok(custom.merged_over(&embedded))
        }
        None => {
            log::debug!("Using embedded modal defaults");
            Ok(embedded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::{BackdropType, ModalSize};

    #[test]
    fn test_embedded_defaults_load() {
        let options = load_default_options(None).unwrap();
        assert_eq!(options.size, Some(ModalSize::Md));
        assert_eq!(options.backdrop_type, Some(BackdropType::Dimmed));
        assert_eq!(options.show_footer, Some(false));
        assert_eq!(options.resolve(), ModalOptions::default().resolve());
    }

    #[test]
    fn test_overrides_win() {
        let options = load_default_options(Some(
            r#"
            size = "lg"
            backdropType = "blur"
            closeOnEsc = false
            "#,
        ))
        .unwrap();
        assert_eq!(options.size, Some(ModalSize::Lg));
        assert_eq!(options.backdrop_type, Some(BackdropType::Blur));
        assert_eq!(options.close_on_esc, Some(false));
        assert_eq!(options.close_on_outside_click, Some(true));
    }

    #[test]
    fn test_bad_document_is_an_error() {
        let err = load_default_options(Some("size = \"giant\"")).unwrap_err();
        assert!(err.to_string().starts_with("invalid modal defaults"));
    }
}
