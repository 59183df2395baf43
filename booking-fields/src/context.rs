//! FormContext: on-disk store of booking form schemas.
//!
//! Each booking form lives in its own YAML file under `forms/`, named after
//! the form's slug. The context keeps the parsed forms in memory with a
//! name index for lookup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};
use ulid::Ulid;

use crate::error::{FieldsError, Result};
use crate::types::{BookingForm, FieldDef};

/// Booking forms seeded into a store on open.
///
/// Consumers build this to pass to [`FormContextBuilder::with_defaults`].
/// Only forms that don't already exist on disk are written.
pub struct FormDefaults {
    forms: Vec<BookingForm>,
}

impl FormDefaults {
    pub fn new() -> Self {
        Self { forms: Vec::new() }
    }

    /// Add a default booking form.
    pub fn form(mut self, form: BookingForm) -> Self {
        self.forms.push(form);
        self
    }

    pub fn forms(&self) -> &[BookingForm] {
        &self.forms
    }
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`FormContext`]. Created by [`FormContext::open`].
pub struct FormContextBuilder {
    root: PathBuf,
    defaults: Option<FormDefaults>,
}

impl FormContextBuilder {
    /// Provide default forms. Existing forms on disk are preserved.
    pub fn with_defaults(mut self, defaults: FormDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Build the context: create directories, seed defaults, load from disk.
    pub async fn build(self) -> Result<FormContext> {
        let root = self.root;
        fs::create_dir_all(root.join("forms")).await?;

        if let Some(defaults) = self.defaults {
            seed_defaults(&root, &defaults).await?;
        }

        let mut ctx = FormContext {
            root,
            forms: Vec::new(),
            name_index: HashMap::new(),
        };
        ctx.load_forms().await?;

        debug!(forms = ctx.forms.len(), "form context opened");
        Ok(ctx)
    }
}

/// Seed default forms whose file is absent. Forms are matched by name.
async fn seed_defaults(root: &Path, defaults: &FormDefaults) -> Result<()> {
    let forms_dir = root.join("forms");
    for form in &defaults.forms {
        form.validate()?;
        let path = forms_dir.join(format!("{}.yaml", form.name));
        if fs::try_exists(&path).await? {
            continue;
        }
        let yaml = serde_yaml_ng::to_string(form)?;
        atomic_write(&path, yaml.as_bytes()).await?;
        debug!(name = %form.name, "seeded default booking form");
    }
    Ok(())
}

/// Store of booking forms.
///
/// ```text
/// <root>/
///   forms/    one .yaml per booking form
/// ```
pub struct FormContext {
    root: PathBuf,
    forms: Vec<BookingForm>,
    name_index: HashMap<String, usize>,
}

impl FormContext {
    /// Open or create a form store. Returns a builder for optional configuration.
    ///
    /// ```rust,ignore
    /// let ctx = FormContext::open(path)
    ///     .with_defaults(booking_defaults())
    ///     .build()
    ///     .await?;
    /// ```
    pub fn open(root: impl Into<PathBuf>) -> FormContextBuilder {
        FormContextBuilder {
            root: root.into(),
            defaults: None,
        }
    }

    pub fn get_form(&self, name: &str) -> Option<&BookingForm> {
        self.name_index.get(name).map(|&i| &self.forms[i])
    }

    /// All forms, in load order.
    pub fn all_forms(&self) -> &[BookingForm] {
        &self.forms
    }

    /// Look up one field of a form.
    pub fn get_field(&self, form: &str, field: &str) -> Option<&FieldDef> {
        self.get_form(form)?.field(field)
    }

    /// Write (create or replace) a booking form. Persists to YAML immediately.
    pub async fn write_form(&mut self, form: &BookingForm) -> Result<()> {
        form.validate()?;
        let yaml = serde_yaml_ng::to_string(form)?;
        atomic_write(&self.form_path(&form.name), yaml.as_bytes()).await?;

        match self.name_index.get(&form.name) {
            Some(&idx) => self.forms[idx] = form.clone(),
            None => {
                self.name_index.insert(form.name.clone(), self.forms.len());
                self.forms.push(form.clone());
            }
        }
        debug!(name = %form.name, fields = form.fields.len(), "booking form written");
        Ok(())
    }

    /// Delete a booking form by name.
    pub async fn delete_form(&mut self, name: &str) -> Result<()> {
        let idx = self
            .name_index
            .remove(name)
            .ok_or_else(|| FieldsError::FormNotFound {
                name: name.to_string(),
            })?;

        let path = self.form_path(name);
        if let Err(e) = fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(e.into());
            }
        }

        // Swap-remove and fix the index of the moved form
        self.forms.swap_remove(idx);
        if let Some(moved) = self.forms.get(idx) {
            self.name_index.insert(moved.name.clone(), idx);
        }
        debug!(%name, "booking form deleted");
        Ok(())
    }

    fn form_path(&self, name: &str) -> PathBuf {
        self.root.join("forms").join(format!("{name}.yaml"))
    }

    async fn load_forms(&mut self) -> Result<()> {
        let forms_dir = self.root.join("forms");
        let mut entries = fs::read_dir(&forms_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            let content = fs::read_to_string(&path).await?;
            let form = match serde_yaml_ng::from_str::<BookingForm>(&content) {
                Ok(form) => form,
                Err(e) => {
                    warn!(?path, %e, "skipping invalid booking form");
                    continue;
                }
            };
            if let Err(e) = form.validate() {
                warn!(?path, %e, "skipping invalid booking form");
                continue;
            }
            self.name_index.insert(form.name.clone(), self.forms.len());
            self.forms.push(form);
        }
        Ok(())
    }
}

/// Write to a temp file then rename for atomic persistence.
async fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent dir"))?;
    let tmp = dir.join(format!(".tmp_{}", Ulid::new()));
    fs::write(&tmp, data).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldType, SelectOption};
    use tempfile::TempDir;

    fn intro_call() -> BookingForm {
        BookingForm::new(
            "intro-call",
            vec![
                FieldDef::new("email", FieldType::Email).required(),
                FieldDef::new("notes", FieldType::Textarea),
            ],
        )
    }

    fn sample_defaults() -> FormDefaults {
        FormDefaults::new().form(intro_call()).form(BookingForm::new(
            "workshop",
            vec![FieldDef::new("size", FieldType::Select)
                .with_options(vec![SelectOption::new("Small", "s")])],
        ))
    }

    #[tokio::test]
    async fn open_creates_forms_directory() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("booking");
        let ctx = FormContext::open(&root).build().await.unwrap();
        assert!(root.join("forms").is_dir());
        assert!(ctx.all_forms().is_empty());
    }

    #[tokio::test]
    async fn defaults_are_seeded() {
        let tmp = TempDir::new().unwrap();
        let ctx = FormContext::open(tmp.path())
            .with_defaults(sample_defaults())
            .build()
            .await
            .unwrap();

        assert_eq!(ctx.all_forms().len(), 2);
        assert!(tmp.path().join("forms/intro-call.yaml").exists());
        assert_eq!(
            ctx.get_field("workshop", "size").unwrap().type_,
            FieldType::Select
        );
    }

    #[tokio::test]
    async fn seeding_preserves_existing_forms() {
        let tmp = TempDir::new().unwrap();
        {
            let mut ctx = FormContext::open(tmp.path()).build().await.unwrap();
            let edited = BookingForm::new(
                "intro-call",
                vec![FieldDef::new("email", FieldType::Email)],
            );
            ctx.write_form(&edited).await.unwrap();
        }

        let ctx = FormContext::open(tmp.path())
            .with_defaults(sample_defaults())
            .build()
            .await
            .unwrap();
        let form = ctx.get_form("intro-call").unwrap();
        assert_eq!(form.fields.len(), 1);
        assert!(!form.fields[0].required);
    }

    #[tokio::test]
    async fn write_replaces_and_persists() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = FormContext::open(tmp.path()).build().await.unwrap();

        let mut form = intro_call();
        ctx.write_form(&form).await.unwrap();
        form.fields.push(FieldDef::new("guests", FieldType::Multiemail));
        ctx.write_form(&form).await.unwrap();

        assert_eq!(ctx.all_forms().len(), 1);
        drop(ctx);

        let reopened = FormContext::open(tmp.path()).build().await.unwrap();
        assert_eq!(reopened.get_form("intro-call"), Some(&form));
        assert!(reopened.get_field("intro-call", "guests").is_some());
    }

    #[tokio::test]
    async fn duplicate_field_names_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = FormContext::open(tmp.path()).build().await.unwrap();
        let form = BookingForm::new(
            "dup",
            vec![
                FieldDef::new("notes", FieldType::Text),
                FieldDef::new("notes", FieldType::Textarea),
            ],
        );
        let err = ctx.write_form(&form).await.unwrap_err();
        assert!(matches!(err, FieldsError::DuplicateFieldName { .. }));
        assert!(!tmp.path().join("forms/dup.yaml").exists());
    }

    #[tokio::test]
    async fn form_names_cannot_leave_forms_directory() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("booking");
        let mut ctx = FormContext::open(&root).build().await.unwrap();

        for name in ["../evil", "nested/form", ""] {
            let err = ctx
                .write_form(&BookingForm::new(name, Vec::new()))
                .await
                .unwrap_err();
            assert!(matches!(err, FieldsError::InvalidFormName { .. }));
        }
        assert!(!root.join("evil.yaml").exists());
        assert!(ctx.all_forms().is_empty());

        let err = ctx.delete_form("../evil").await.unwrap_err();
        assert!(matches!(err, FieldsError::FormNotFound { .. }));
    }

    #[tokio::test]
    async fn delete_fixes_index() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = FormContext::open(tmp.path())
            .with_defaults(sample_defaults())
            .build()
            .await
            .unwrap();

        let first = ctx.all_forms()[0].name.clone();
        let second = ctx.all_forms()[1].name.clone();
        ctx.delete_form(&first).await.unwrap();

        assert!(ctx.get_form(&first).is_none());
        assert_eq!(ctx.get_form(&second).unwrap().name, second);
        assert!(!tmp.path().join(format!("forms/{first}.yaml")).exists());
    }

    #[tokio::test]
    async fn delete_unknown_form_errors() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = FormContext::open(tmp.path()).build().await.unwrap();
        let err = ctx.delete_form("missing").await.unwrap_err();
        assert!(matches!(err, FieldsError::FormNotFound { .. }));
    }

    #[tokio::test]
    async fn invalid_files_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let forms = tmp.path().join("forms");
        std::fs::create_dir_all(&forms).unwrap();
        std::fs::write(forms.join("broken.yaml"), "name: broken\nfields: 12\n").unwrap();
        std::fs::write(
            forms.join("unknown.yaml"),
            "name: unknown\nfields:\n  - name: x\n    type: signature\n",
        )
        .unwrap();
        std::fs::write(forms.join("README.md"), "not a form").unwrap();

        let ctx = FormContext::open(tmp.path())
            .with_defaults(FormDefaults::new().form(intro_call()))
            .build()
            .await
            .unwrap();
        let names: Vec<_> = ctx.all_forms().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["intro-call"]);
    }
}
