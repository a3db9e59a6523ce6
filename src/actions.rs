//! Ready-made actions for the portal's content categories

use crate::catalog::Permission::*;
use crate::engine::Action;

// Files (folders, files, links)
pub const FILES_VIEW: Action = Action::uniform(FilesView);
pub const FILES_DOWNLOAD: Action = Action::uniform(FilesDownload);
/// Checked against the target folder
pub const FILES_UPLOAD: Action = Action::uniform(FilesUpload);
pub const FILES_CREATE_FOLDER: Action = Action::uniform(FilesCreateFolder);
pub const FILES_EDIT: Action = Action::owned(FilesEditOwn, FilesEditAny);
pub const FILES_DELETE: Action = Action::owned(FilesDeleteOwn, FilesDeleteAny);
pub const FILES_VIEW_INACTIVE: Action = Action::view_inactive(FilesManage);

// Knowledge base
pub const KNOWLEDGE_VIEW: Action = Action::uniform(KnowledgeView);
pub const KNOWLEDGE_EDIT: Action = Action::owned(KnowledgeEditOwn, KnowledgeEditAny);
pub const KNOWLEDGE_DELETE: Action = Action::owned(KnowledgeDeleteOwn, KnowledgeDeleteAny);
pub const KNOWLEDGE_VIEW_INACTIVE: Action = Action::view_inactive(KnowledgeManage);

// Institutional areas
pub const INSTITUTIONAL_VIEW: Action = Action::uniform(InstitutionalView);
pub const INSTITUTIONAL_EDIT: Action = Action::owned(InstitutionalEditOwn, InstitutionalEditAny);
pub const INSTITUTIONAL_DELETE: Action = Action::owned(InstitutionalDeleteOwn, InstitutionalDeleteAny);
pub const INSTITUTIONAL_VIEW_INACTIVE: Action = Action::view_inactive(InstitutionalManage);

// Job postings
pub const JOBS_VIEW: Action = Action::uniform(JobsView);
pub const JOBS_APPLY: Action = Action::uniform(JobsApply);
pub const JOBS_EDIT: Action = Action::owned(JobsEditOwn, JobsEditAny);
pub const JOBS_DELETE: Action = Action::owned(JobsDeleteOwn, JobsDeleteAny);
pub const JOBS_VIEW_INACTIVE: Action = Action::view_inactive(JobsManage);
