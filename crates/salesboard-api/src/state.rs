use std::sync::Arc;

use salesboard_core::DateMatching;
use salesboard_db::RecordStore;
use salesboard_import::DatasetImporter;

#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn RecordStore>,
    pub importer: Arc<DatasetImporter>,
    pub date_matching: DateMatching,
}

impl ApiState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        importer: DatasetImporter,
        date_matching: DateMatching,
    ) -> Self {
        Self {
            store,
            importer: Arc::new(importer),
            date_matching,
        }
    }
}
