//! Trait seams for the collaborators the core depends on but does not
//! implement: template persistence, asset URL resolution, and the
//! asynchronous export job system. The core only needs their input/output
//! shapes; hosts provide the real implementations.

use std::collections::BTreeMap;

use crate::{
    customize::CustomizationMap,
    error::{ReelError, ReelResult},
};

/// Stores and retrieves canonical template JSON blobs keyed by template id.
pub trait TemplateStore {
    fn save(&mut self, blob: &str) -> ReelResult<String>;
    fn load(&self, template_id: &str) -> ReelResult<String>;
}

/// Resolves opaque asset references (element `src` values) to fetchable
/// URLs.
pub trait AssetResolver {
    fn resolve_url(&self, asset_ref: &str) -> ReelResult<String>;
}

/// State of an export job, polled by the caller.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStatus {
    pub state: ExportState,
    /// 0..=100.
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportState {
    Queued,
    Processing,
    Done,
    Failed,
}

/// Queues video-encoding jobs over a canonical template blob plus a
/// customization map; encoding itself happens elsewhere.
pub trait ExportJobQueue {
    fn enqueue(
        &mut self,
        blob: &str,
        customizations: &CustomizationMap,
        format: &str,
        quality: &str,
    ) -> ReelResult<String>;

    fn status(&self, job_id: &str) -> ReelResult<ExportStatus>;
}

/// In-memory store, enough for tests and single-process tools.
#[derive(Debug, Default)]
pub struct InMemoryTemplateStore {
    blobs: BTreeMap<String, String>,
    next_id: u64,
}

impl TemplateStore for InMemoryTemplateStore {
    fn save(&mut self, blob: &str) -> ReelResult<String> {
        self.next_id += 1;
        let id = format!("tpl-{}", self.next_id);
        self.blobs.insert(id.clone(), blob.to_string());
        Ok(id)
    }

    fn load(&self, template_id: &str) -> ReelResult<String> {
        self.blobs
            .get(template_id)
            .cloned()
            .ok_or_else(|| ReelError::not_found(format!("template '{template_id}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::CanvasSize, edit::TemplateEditor, export};

    #[test]
    fn in_memory_store_round_trips_blobs() {
        let ed = TemplateEditor::new(CanvasSize::new(640, 480).unwrap());
        let blob = export::export_template_string(ed.template()).unwrap();

        let mut store = InMemoryTemplateStore::default();
        let id = store.save(&blob).unwrap();
        let loaded = store.load(&id).unwrap();
        assert_eq!(loaded, blob);

        let back = export::import_template(&loaded).unwrap();
        assert_eq!(&back, ed.template());
    }

    #[test]
    fn load_unknown_id_is_not_found() {
        let store = InMemoryTemplateStore::default();
        assert!(matches!(
            store.load("tpl-404"),
            Err(ReelError::NotFound(_))
        ));
    }

    #[test]
    fn export_status_serializes_camel_case() {
        let st = ExportStatus {
            state: ExportState::Done,
            progress: 100,
            download_url: Some("https://cdn/video.mp4".to_string()),
        };
        let v = serde_json::to_value(&st).unwrap();
        assert_eq!(v["state"], "done");
        assert_eq!(v["downloadUrl"], "https://cdn/video.mp4");
    }
}
