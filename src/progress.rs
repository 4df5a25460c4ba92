//! Progress-callback trait for per-page processing events.
//!
//! Inject an [`Arc<dyn ProcessingProgressCallback>`] via
//! [`crate::config::ProcessingConfigBuilder::progress_callback`] to receive
//! real-time events as the pipeline walks the document's pages.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a channel, a web socket, a database record, or a
//! terminal progress bar — without the library knowing anything about how the
//! host application communicates. The trait is `Send + Sync` because the
//! front end may process several documents in parallel, each driving its own
//! callback from a different blocking thread.

use std::sync::Arc;

/// Called by the processing pipeline as it walks each page of a document.
///
/// Pages within one document are strictly sequential, so for a single
/// document the events arrive in order. All methods have default no-op
/// implementations so callers only override what they care about.
pub trait ProcessingProgressCallback: Send + Sync {
    /// Called once after the source document is opened.
    ///
    /// # Arguments
    /// * `total_pages` — page count of the source document
    fn on_document_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before a page is classified.
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page is dropped as blank.
    fn on_page_blank(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page is kept and appended to the output document.
    ///
    /// # Arguments
    /// * `rotation`   — absolute rotation applied, in degrees (0 if upright)
    /// * `searchable` — whether the appended page carries a fresh OCR text layer
    fn on_page_kept(&self, page_num: usize, total_pages: usize, rotation: u32, searchable: bool) {
        let _ = (page_num, total_pages, rotation, searchable);
    }

    /// Called once after the last page has been handled, before the output
    /// document is saved (or the all-blank error is raised).
    fn on_document_complete(&self, kept_pages: usize, total_pages: usize) {
        let _ = (kept_pages, total_pages);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl ProcessingProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ProcessingConfig`].
pub type ProgressCallback = Arc<dyn ProcessingProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        blanks: AtomicUsize,
        kept: AtomicUsize,
        rotated: AtomicUsize,
        completed_kept: AtomicUsize,
    }

    impl ProcessingProgressCallback for TrackingCallback {
        fn on_page_blank(&self, _page_num: usize, _total_pages: usize) {
            self.blanks.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_kept(
            &self,
            _page_num: usize,
            _total_pages: usize,
            rotation: u32,
            _searchable: bool,
        ) {
            self.kept.fetch_add(1, Ordering::SeqCst);
            if rotation != 0 {
                self.rotated.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn on_document_complete(&self, kept_pages: usize, _total_pages: usize) {
            self.completed_kept.store(kept_pages, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_document_start(3);
        cb.on_page_start(1, 3);
        cb.on_page_blank(2, 3);
        cb.on_page_kept(3, 3, 90, true);
        cb.on_document_complete(2, 3);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            blanks: AtomicUsize::new(0),
            kept: AtomicUsize::new(0),
            rotated: AtomicUsize::new(0),
            completed_kept: AtomicUsize::new(0),
        };

        tracker.on_document_start(3);
        tracker.on_page_start(1, 3);
        tracker.on_page_kept(1, 3, 0, false);
        tracker.on_page_start(2, 3);
        tracker.on_page_blank(2, 3);
        tracker.on_page_start(3, 3);
        tracker.on_page_kept(3, 3, 270, false);
        tracker.on_document_complete(2, 3);

        assert_eq!(tracker.blanks.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.kept.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.rotated.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.completed_kept.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn ProcessingProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_document_start(10);
        cb.on_page_kept(1, 10, 0, false);
    }
}
