//! Source stubs by textual substitution.
//!
//! A stub is produced from an existing example file by replacing every casing
//! of one identifier with the same casing of another. There is no parsing
//! involved: the output is only as correct as the template and the names.

mod naming;

pub use naming::*;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::files::FileManager;
use crate::work_items;

/// Replace every casing of `source_name` in `template` with the matching casing of `target_name`.
///
/// Lowercase-initial variants only match where they are not glued to a preceding
/// letter, so `order` is replaced in `order_id` but not in `border`.
pub fn render_stub(template: &str, source_name: &str, target_name: &str) -> Result<String, ToolError> {
    let source = NameVariants::new(source_name).ok_or_else(|| {
        ToolError::InvalidArgument(format!("'{}' is not a usable identifier", source_name))
    })?;
    let target = NameVariants::new(target_name).ok_or_else(|| {
        ToolError::InvalidArgument(format!("'{}' is not a usable identifier", target_name))
    })?;

    // Single-word sources share spellings across variants; the first pairing
    // wins, so a lowercase `product` becomes the camelCase target.
    let mut replacements: HashMap<&str, &str> = HashMap::new();
    for (from, to) in source.pairs(&target) {
        replacements.entry(from).or_insert(to);
    }

    // Longest first so `ProductList` wins over `Product` at the same position.
    let mut needles: Vec<&str> = replacements.keys().copied().collect();
    needles.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let alternation = needles
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|");
    let matcher = Regex::new(&alternation)?;

    let rendered = matcher.replace_all(template, |caps: &Captures| {
        let Some(found) = caps.get(0) else {
            return String::new();
        };
        let text = found.as_str();
        let starts_lower = text.starts_with(|c: char| c.is_lowercase());
        let glued = template[..found.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphabetic());
        if starts_lower && glued {
            return text.to_string();
        }
        replacements.get(text).copied().unwrap_or(text).to_string()
    });

    Ok(rendered.into_owned())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedStub {
    /// The user story the stub was generated for, if any.
    pub story_id: Option<String>,
    pub type_name: String,
    pub path: String,
    pub bytes_written: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedStub {
    pub story_id: String,
    pub path: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateControllersResponse {
    pub generated: Vec<GeneratedStub>,
    pub skipped: Vec<SkippedStub>,
}

/// Render `template_path` with `source_name` replaced by `target_name` and write it to `output_path`.
pub fn generate_stub(
    files: &FileManager,
    template_path: &str,
    source_name: &str,
    target_name: &str,
    output_path: &str,
    overwrite: bool,
) -> Result<GeneratedStub, ToolError> {
    let template = files.read_file(template_path)?;
    let rendered = render_stub(&template.content, source_name, target_name)?;

    let resolved = files.resolve(output_path)?;
    if resolved.exists() && !overwrite {
        return Err(ToolError::AlreadyExists(resolved));
    }

    let written = files.write_file(output_path, &rendered, true)?;
    Ok(GeneratedStub {
        story_id: None,
        type_name: target_name.to_string(),
        path: written.path,
        bytes_written: written.bytes_written,
    })
}

/// Generate one stub per user story in the work-item file.
///
/// Each story's title becomes the type name. A name already taken by an
/// earlier story gets the story number appended, then a counter, so every
/// story gets its own file. The output file name is the
/// template's file name with the same substitution applied, or
/// `<TypeName>.<ext>` when the template's name does not contain `source_name`.
pub fn generate_controllers(
    files: &FileManager,
    work_items_path: &str,
    template_path: &str,
    source_name: &str,
    output_dir: &str,
    overwrite: bool,
) -> Result<GenerateControllersResponse, ToolError> {
    let document = work_items::load(&files.resolve(work_items_path)?)?;
    let template = files.read_file(template_path)?;

    let template_name = Path::new(template_path)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ToolError::InvalidArgument(format!("'{}' has no file name", template_path)))?;
    let extension = Path::new(template_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    let mut response = GenerateControllersResponse {
        generated: Vec::new(),
        skipped: Vec::new(),
    };
    let mut used_names = HashSet::new();

    for story in document.user_stories() {
        let Some(mut type_name) = type_name_for(&story.title) else {
            response.skipped.push(SkippedStub {
                story_id: story.id.clone(),
                path: None,
                reason: format!("title '{}' yields no identifier", story.title),
            });
            continue;
        };
        if !used_names.insert(type_name.clone()) {
            let base = format!("{}{}", type_name, story.id.trim_start_matches("US"));
            type_name = base.clone();
            let mut n = 2;
            while !used_names.insert(type_name.clone()) {
                type_name = format!("{}{}", base, n);
                n += 1;
            }
        }

        let mut file_name = render_stub(template_name, source_name, &type_name)?;
        if file_name == template_name {
            file_name = format!("{}{}", type_name, extension);
        }
        let output_path = Path::new(output_dir).join(&file_name);
        let output_path = output_path.to_string_lossy();

        if files.resolve(&output_path)?.exists() && !overwrite {
            response.skipped.push(SkippedStub {
                story_id: story.id.clone(),
                path: Some(output_path.to_string()),
                reason: "file already exists".to_string(),
            });
            continue;
        }

        let rendered = render_stub(&template.content, source_name, &type_name)?;
        let written = files.write_file(&output_path, &rendered, true)?;
        tracing::info!("Generated {} for {}", written.path, story.id);

        response.generated.push(GeneratedStub {
            story_id: Some(story.id.clone()),
            type_name,
            path: written.path,
            bytes_written: written.bytes_written,
        });
    }

    Ok(response)
}
