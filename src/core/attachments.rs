//! Attachment intake and file/image list maintenance for projects
//!
//! Intake reads only file metadata: the resulting [`ProjectFile`] points at
//! the local bytes through a `file://` URL. Attaching, renaming and removing
//! rewrite the project's metadata list through the store's ordinary
//! project update, so each one also stamps `updated_at`.

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::core::forms::ValidationError;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::store::EntityStore;
use crate::entities::file::{self, ProjectFile, ProjectFileType, ALLOWED_EXTENSIONS};
use crate::entities::project::{ProjectImage, ProjectUpdate};

#[derive(Debug, Error, Diagnostic)]
pub enum AttachmentError {
    #[error("file type not accepted: {name}")]
    #[diagnostic(
        code(obra::attach::rejected),
        help("accepted extensions: {}", ALLOWED_EXTENSIONS.join(", "))
    )]
    Rejected { name: String },

    #[error("not an image: {name}")]
    #[diagnostic(code(obra::attach::not_image), help("images must be jpg, jpeg, png or webp"))]
    NotAnImage { name: String },

    #[error("cannot read {path:?}")]
    #[diagnostic(code(obra::attach::unreadable))]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("project not found: {0}")]
    #[diagnostic(code(obra::attach::project_not_found))]
    ProjectNotFound(EntityId),

    #[error("no attachment {attachment} on project {project}")]
    #[diagnostic(code(obra::attach::attachment_not_found))]
    AttachmentNotFound { project: EntityId, attachment: EntityId },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),
}

struct LocalFile {
    name: String,
    url: String,
    size: u64,
}

fn inspect(path: &Path) -> Result<LocalFile, AttachmentError> {
    let unreadable = |source| AttachmentError::Unreadable {
        path: path.to_path_buf(),
        source,
    };
    let meta = std::fs::metadata(path).map_err(unreadable)?;
    if !meta.is_file() {
        return Err(unreadable(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    let absolute = path.canonicalize().map_err(unreadable)?;
    let url = url::Url::from_file_path(&absolute)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("file://{}", absolute.display()));
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(LocalFile {
        name,
        url,
        size: meta.len(),
    })
}

/// Build attachment metadata for a local file
///
/// Rejects extensions outside the allow-list; type comes from the
/// extension and mime type is guessed from it, never sniffed.
pub fn intake(
    path: &Path,
    uploaded_by: &str,
    now: DateTime<Utc>,
) -> Result<ProjectFile, AttachmentError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !file::is_allowed(&name) {
        return Err(AttachmentError::Rejected { name });
    }

    let local = inspect(path)?;
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    debug!(name = %local.name, size = local.size, mime = %mime_type, "intake");

    Ok(ProjectFile {
        id: EntityId::new(EntityPrefix::File),
        file_type: ProjectFileType::from_name(&local.name),
        name: local.name,
        url: local.url,
        size: local.size,
        mime_type,
        uploaded_at: now,
        uploaded_by: uploaded_by.to_string(),
    })
}

/// Append files to a project, keeping existing ones
pub fn attach_files(
    store: &mut EntityStore,
    project_id: &EntityId,
    new_files: Vec<ProjectFile>,
) -> Result<usize, AttachmentError> {
    let project = store
        .get_project(project_id)
        .ok_or_else(|| AttachmentError::ProjectNotFound(project_id.clone()))?;

    let count = new_files.len();
    let mut files = project.files.clone();
    files.extend(new_files);
    store.update_project(project_id, ProjectUpdate::default().files(files));
    Ok(count)
}

/// Rename an attached file; the trimmed name must not be blank
pub fn rename_file(
    store: &mut EntityStore,
    project_id: &EntityId,
    file_id: &EntityId,
    new_name: &str,
) -> Result<(), AttachmentError> {
    let trimmed = new_name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError {
            missing: vec!["name"],
        }
        .into());
    }

    let project = store
        .get_project(project_id)
        .ok_or_else(|| AttachmentError::ProjectNotFound(project_id.clone()))?;
    if project.file(file_id).is_none() {
        return Err(AttachmentError::AttachmentNotFound {
            project: project_id.clone(),
            attachment: file_id.clone(),
        });
    }

    let files = project
        .files
        .iter()
        .cloned()
        .map(|mut f| {
            if &f.id == file_id {
                f.name = trimmed.to_string();
            }
            f
        })
        .collect();
    store.update_project(project_id, ProjectUpdate::default().files(files));
    Ok(())
}

/// Detach a file from a project and return its metadata
pub fn remove_file(
    store: &mut EntityStore,
    project_id: &EntityId,
    file_id: &EntityId,
) -> Result<ProjectFile, AttachmentError> {
    let project = store
        .get_project(project_id)
        .ok_or_else(|| AttachmentError::ProjectNotFound(project_id.clone()))?;
    let removed = project
        .file(file_id)
        .cloned()
        .ok_or_else(|| AttachmentError::AttachmentNotFound {
            project: project_id.clone(),
            attachment: file_id.clone(),
        })?;

    let files = project
        .files
        .iter()
        .filter(|f| &f.id != file_id)
        .cloned()
        .collect();
    store.update_project(project_id, ProjectUpdate::default().files(files));
    Ok(removed)
}

/// Attach a local image to a project's gallery, stamped by the store's clock
pub fn add_image(
    store: &mut EntityStore,
    project_id: &EntityId,
    path: &Path,
) -> Result<EntityId, AttachmentError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if ProjectFileType::from_name(&name) != ProjectFileType::Image {
        return Err(AttachmentError::NotAnImage { name });
    }

    let project = store
        .get_project(project_id)
        .ok_or_else(|| AttachmentError::ProjectNotFound(project_id.clone()))?;
    let local = inspect(path)?;

    let image = ProjectImage {
        id: EntityId::new(EntityPrefix::Img),
        url: local.url,
        name: local.name,
        created_at: store.now(),
    };
    let id = image.id.clone();
    let mut images = project.images.clone();
    images.push(image);
    store.update_project(project_id, ProjectUpdate::default().images(images));
    Ok(id)
}

pub fn remove_image(
    store: &mut EntityStore,
    project_id: &EntityId,
    image_id: &EntityId,
) -> Result<ProjectImage, AttachmentError> {
    let project = store
        .get_project(project_id)
        .ok_or_else(|| AttachmentError::ProjectNotFound(project_id.clone()))?;
    let removed = project
        .images
        .iter()
        .find(|i| &i.id == image_id)
        .cloned()
        .ok_or_else(|| AttachmentError::AttachmentNotFound {
            project: project_id.clone(),
            attachment: image_id.clone(),
        })?;

    let images = project
        .images
        .iter()
        .filter(|i| &i.id != image_id)
        .cloned()
        .collect();
    store.update_project(project_id, ProjectUpdate::default().images(images));
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::tempdir;

    fn frozen() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
    }

    fn pid() -> EntityId {
        EntityId::from("1")
    }

    #[test]
    fn test_intake_reads_metadata() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("planta.pdf");
        fs::write(&path, vec![0u8; 2048]).unwrap();

        let file = intake(&path, "Ana", frozen()).unwrap();
        assert_eq!(file.name, "planta.pdf");
        assert_eq!(file.uploaded_at, frozen());
        assert_eq!(file.size, 2048);
        assert_eq!(file.file_type, ProjectFileType::Pdf);
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.uploaded_by, "Ana");
        assert!(file.url.starts_with("file://"));
        assert_eq!(file.id.prefix(), Some(EntityPrefix::File));
    }

    #[test]
    fn test_intake_rejects_unlisted_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notas.txt");
        fs::write(&path, "x").unwrap();
        let err = intake(&path, "Ana", frozen()).unwrap_err();
        assert!(matches!(err, AttachmentError::Rejected { .. }));
    }

    #[test]
    fn test_intake_missing_file() {
        let err = intake(Path::new("/nonexistent/foto.png"), "Ana", frozen()).unwrap_err();
        assert!(matches!(err, AttachmentError::Unreadable { .. }));
    }

    #[test]
    fn test_attach_rename_remove_cycle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("foto.jpg");
        fs::write(&path, "jpg").unwrap();

        let mut store = EntityStore::seeded();
        let stamp = store.get_project(&pid()).unwrap().updated_at;

        let file = intake(&path, "Ana", frozen()).unwrap();
        let file_id = file.id.clone();
        assert_eq!(attach_files(&mut store, &pid(), vec![file]).unwrap(), 1);
        let project = store.get_project(&pid()).unwrap();
        assert_eq!(project.files.len(), 1);
        assert!(project.updated_at > stamp);

        rename_file(&mut store, &pid(), &file_id, "  obra.jpg ").unwrap();
        assert_eq!(store.get_project(&pid()).unwrap().files[0].name, "obra.jpg");

        let removed = remove_file(&mut store, &pid(), &file_id).unwrap();
        assert_eq!(removed.name, "obra.jpg");
        assert!(store.get_project(&pid()).unwrap().files.is_empty());
    }

    #[test]
    fn test_attached_file_stamped_by_store_clock() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("orcamento.xlsx");
        fs::write(&path, "xlsx").unwrap();

        let mut store = EntityStore::seeded_with_clock(Box::new(FixedClock(frozen())));
        let file = intake(&path, "Ana", store.now()).unwrap();
        attach_files(&mut store, &pid(), vec![file]).unwrap();

        let project = store.get_project(&pid()).unwrap();
        assert_eq!(project.files[0].uploaded_at, frozen());
        assert_eq!(project.files[0].file_type, ProjectFileType::Spreadsheet);
    }

    #[test]
    fn test_rename_to_blank_is_rejected() {
        let mut store = EntityStore::seeded();
        let err = rename_file(&mut store, &pid(), &EntityId::from("f"), "   ").unwrap_err();
        assert!(matches!(err, AttachmentError::Validation(_)));
    }

    #[test]
    fn test_missing_targets() {
        let mut store = EntityStore::seeded();
        let version = store.version();

        let err = attach_files(&mut store, &EntityId::from("404"), Vec::new()).unwrap_err();
        assert!(matches!(err, AttachmentError::ProjectNotFound(_)));
        let err = remove_file(&mut store, &pid(), &EntityId::from("nope")).unwrap_err();
        assert!(matches!(err, AttachmentError::AttachmentNotFound { .. }));

        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_images() {
        let dir = tempdir().unwrap();
        let photo = dir.path().join("antes.png");
        fs::write(&photo, "png").unwrap();
        let doc = dir.path().join("contrato.pdf");
        fs::write(&doc, "pdf").unwrap();

        let mut store = EntityStore::seeded_with_clock(Box::new(FixedClock(frozen())));
        let err = add_image(&mut store, &pid(), &doc).unwrap_err();
        assert!(matches!(err, AttachmentError::NotAnImage { .. }));

        let image_id = add_image(&mut store, &pid(), &photo).unwrap();
        let images = &store.get_project(&pid()).unwrap().images;
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].created_at, frozen());
        let removed = remove_image(&mut store, &pid(), &image_id).unwrap();
        assert_eq!(removed.name, "antes.png");
        assert!(store.get_project(&pid()).unwrap().images.is_empty());
    }
}
