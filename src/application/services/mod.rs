pub mod clipboard_extractor;
pub mod content_parser;
pub mod copy_service;
pub mod formatter;
pub mod highlight_adapter;
pub mod language_classifier;
pub mod markup;
pub mod notification_manager;
pub mod scroll_controller;
pub mod segment_cache;
pub mod truncation;

pub use clipboard_extractor::{ClipboardExtractor, CopyFeedback, CopyTarget};
pub use content_parser::ContentParser;
pub use copy_service::CopyService;
pub use highlight_adapter::HighlightAdapter;
pub use language_classifier::LanguageClassifier;
pub use notification_manager::NotificationManager;
pub use scroll_controller::{GrowthOutcome, ScrollController, ScrollMetrics, ScrollState};
pub use segment_cache::SegmentCache;
pub use truncation::{TruncationManager, TruncationPolicy};
