//! Presentation classes attached to rendered elements.
//!
//! The values are opaque to the engine. Defaults reproduce the blog's
//! utility-class styling.

use serde::{Deserialize, Serialize};

use crate::domain::document::{HeadingLevel, ListStyle};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    pub paragraph: String,
    /// Indexed by heading level, `h1` first.
    pub headings: [String; 6],
    pub quote: String,
    pub bullet_list: String,
    pub number_list: String,
    pub check_list: String,
    pub list_item: String,
    pub code_block: String,
    pub inline_code: String,
    pub link: String,
    pub upload: String,
    pub image: String,
    pub figure: String,
    pub figcaption: String,
    pub video_figure: String,
    pub video_frame: String,
    pub video_embed: String,
    pub video_player: String,
    pub video_fallback: String,
    pub video_fallback_label: String,
    pub video_fallback_link: String,
    pub file_link: String,
}

impl ClassNames {
    pub fn heading(&self, level: HeadingLevel) -> &str {
        &self.headings[usize::from(level.number() - 1)]
    }

    pub fn list(&self, style: ListStyle) -> &str {
        match style {
            ListStyle::Bullet => &self.bullet_list,
            ListStyle::Number { .. } => &self.number_list,
            ListStyle::Check => &self.check_list,
        }
    }

    /// Every class empty; output carries no `class` attributes.
    pub fn unstyled() -> Self {
        Self {
            paragraph: String::new(),
            headings: Default::default(),
            quote: String::new(),
            bullet_list: String::new(),
            number_list: String::new(),
            check_list: String::new(),
            list_item: String::new(),
            code_block: String::new(),
            inline_code: String::new(),
            link: String::new(),
            upload: String::new(),
            image: String::new(),
            figure: String::new(),
            figcaption: String::new(),
            video_figure: String::new(),
            video_frame: String::new(),
            video_embed: String::new(),
            video_player: String::new(),
            video_fallback: String::new(),
            video_fallback_label: String::new(),
            video_fallback_link: String::new(),
            file_link: String::new(),
        }
    }
}

impl Default for ClassNames {
    fn default() -> Self {
        let owned = |class: &str| class.to_string();
        Self {
            paragraph: owned("mb-4 leading-relaxed text-gray-800"),
            headings: [
                owned("text-4xl font-bold mt-8 mb-4 text-gray-900"),
                owned("text-3xl font-semibold mt-6 mb-3 text-gray-900"),
                owned("text-2xl font-semibold mt-5 mb-2 text-gray-900"),
                owned("text-xl font-medium mt-4 mb-2 text-gray-900"),
                owned("text-lg font-medium mt-3 mb-2 text-gray-900"),
                owned("text-base font-medium mt-2 mb-1 text-gray-900"),
            ],
            quote: owned(
                "border-l-4 border-blue-500 pl-4 py-2 mb-4 italic text-gray-700 bg-gray-50 rounded-r",
            ),
            bullet_list: owned("list-disc list-inside mb-4 ml-4 space-y-1"),
            number_list: owned("list-decimal list-inside mb-4 ml-4 space-y-1"),
            check_list: owned("list-none mb-4 ml-4 space-y-1"),
            list_item: owned("text-gray-800"),
            code_block: owned("bg-gray-900 text-gray-100 p-4 rounded-lg overflow-x-auto my-4 text-sm"),
            inline_code: owned("bg-gray-100 px-1.5 py-0.5 rounded text-sm font-mono text-red-600"),
            link: owned("text-blue-600 hover:text-blue-800 underline"),
            upload: owned("my-6 flex justify-center"),
            image: owned("rounded-lg shadow-lg"),
            figure: owned("my-8 flex flex-col items-center"),
            figcaption: owned("mt-2 text-sm text-gray-600 text-center italic max-w-lg"),
            video_figure: owned("my-8"),
            video_frame: owned(
                "relative w-full rounded-lg overflow-hidden shadow-lg aspect-video bg-gray-100",
            ),
            video_embed: owned("absolute inset-0 w-full h-full"),
            video_player: owned("w-full h-full object-contain"),
            video_fallback: owned("p-4 bg-gray-100 rounded-lg text-center"),
            video_fallback_label: owned("text-gray-600 mb-2"),
            video_fallback_link: owned("text-blue-600 hover:text-blue-800 underline break-all"),
            file_link: owned("text-blue-600 hover:text-blue-800 underline"),
        }
    }
}
