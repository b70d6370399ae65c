//! Component libraries — where the loader gets its components from.
//!
//! `SvgIconLibrary` reads a directory of SVG files laid out like the lucide
//! static package: the export `ChevronRight` lives in `chevron-right.svg`,
//! `Loader2` in `loader-2.svg`.

use std::path::PathBuf;
use std::sync::Arc;

use super::LoadError;

pub const DEFAULT_ICON_SIZE: u32 = 24;

#[async_trait::async_trait]
pub trait ComponentLibrary: Send + Sync + 'static {
    type Component: Clone + Send + Sync + 'static;

    /// Human-readable library name, used in not-found messages.
    fn name(&self) -> &str;

    /// Look up one named export. `Ok(None)` means the name does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Library`] when the library itself cannot be read.
    async fn export(&self, name: &str) -> Result<Option<Self::Component>, LoadError>;
}

// =============================================================================
// RENDERING
// =============================================================================

/// Presentation props shared by real icons and their placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconProps {
    pub size: Option<u32>,
    pub class: Option<String>,
    pub color: Option<String>,
}

impl IconProps {
    #[must_use]
    pub fn sized(size: u32) -> Self {
        Self { size: Some(size), ..Self::default() }
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    #[must_use]
    pub fn effective_size(&self) -> u32 {
        self.size.unwrap_or(DEFAULT_ICON_SIZE)
    }
}

pub trait RenderIcon {
    fn render(&self, props: &IconProps) -> String;
}

impl<T: RenderIcon + ?Sized> RenderIcon for Arc<T> {
    fn render(&self, props: &IconProps) -> String {
        (**self).render(props)
    }
}

/// Empty inline box reserving the icon's footprint.
#[must_use]
pub fn render_placeholder(props: &IconProps) -> String {
    let size = props.effective_size();
    let class = props.class.as_deref().map(|c| format!(" class=\"{}\"", escape_attr(c))).unwrap_or_default();
    format!("<span{class} style=\"display:inline-block;width:{size}px;height:{size}px\"></span>")
}

// =============================================================================
// SVG ICONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgIcon {
    pub name: String,
    pub markup: String,
}

impl RenderIcon for SvgIcon {
    fn render(&self, props: &IconProps) -> String {
        let Some(start) = self.markup.find("<svg") else {
            return self.markup.clone();
        };
        let Some(rel_end) = self.markup[start..].find('>') else {
            return self.markup.clone();
        };
        let end = start + rel_end;

        let size = props.effective_size().to_string();
        let mut tag = self.markup[start..end].to_string();
        set_attr(&mut tag, "width", &size);
        set_attr(&mut tag, "height", &size);
        if let Some(class) = &props.class {
            set_attr(&mut tag, "class", &escape_attr(class));
        }
        if let Some(color) = &props.color {
            set_attr(&mut tag, "stroke", &escape_attr(color));
        }

        format!("{}{}{}", &self.markup[..start], tag, &self.markup[end..])
    }
}

/// Replace `key="..."` inside an opening tag (without its `>`), or append it.
fn set_attr(tag: &mut String, key: &str, value: &str) {
    let needle = format!(" {key}=\"");
    if let Some(pos) = tag.find(&needle) {
        let value_start = pos + needle.len();
        if let Some(len) = tag[value_start..].find('"') {
            tag.replace_range(value_start..value_start + len, value);
            return;
        }
    }
    let insert_at = if tag.ends_with('/') { tag.len() - 1 } else { tag.len() };
    tag.insert_str(insert_at, &format!(" {key}=\"{value}\""));
}

fn escape_attr(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;")
}

/// `ChevronRight` → `chevron-right`, `Loader2` → `loader-2`.
#[must_use]
pub fn export_file_stem(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if let Some(p) = prev {
            let boundary = (c.is_ascii_uppercase()) || (c.is_ascii_digit() && p.is_ascii_alphabetic());
            if boundary {
                out.push('-');
            }
        }
        out.push(c.to_ascii_lowercase());
        prev = Some(c);
    }
    out
}

/// PascalCase ASCII identifier: the only shape an export name can take.
#[must_use]
pub fn is_export_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase()) && chars.all(|c| c.is_ascii_alphanumeric())
}

pub struct SvgIconLibrary {
    dir: PathBuf,
    label: String,
}

impl SvgIconLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), label: "lucide".to_string() }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.svg", export_file_stem(name)))
    }
}

#[async_trait::async_trait]
impl ComponentLibrary for SvgIconLibrary {
    type Component = Arc<SvgIcon>;

    fn name(&self) -> &str {
        &self.label
    }

    async fn export(&self, name: &str) -> Result<Option<Self::Component>, LoadError> {
        if !is_export_name(name) {
            return Ok(None);
        }
        let path = self.path_for(name);
        let markup = match tokio::fs::read_to_string(&path).await {
            Ok(markup) => markup,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LoadError::Library(format!("{}: {e}", path.display()))),
        };
        if !markup.contains("<svg") {
            return Err(LoadError::Library(format!("{} is not an SVG document", path.display())));
        }
        Ok(Some(Arc::new(SvgIcon { name: name.to_string(), markup })))
    }
}

#[cfg(test)]
#[path = "library_test.rs"]
mod tests;
