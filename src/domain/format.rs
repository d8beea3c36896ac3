//! Text formatting bitmask carried by text runs.
//!
//! The editor packs seven independent flags into one integer. Presentation
//! order is fixed: [`Decoration::NESTING_ORDER`] lists decorations from the
//! outermost wrapper to the innermost, and every render applies them in that
//! order regardless of which subset is set.

use bitflags::bitflags;

bitflags! {
    /// Formatting flags of a single text run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextFormat: u32 {
        const BOLD = 1;
        const ITALIC = 1 << 1;
        const STRIKETHROUGH = 1 << 2;
        const UNDERLINE = 1 << 3;
        const CODE = 1 << 4;
        const SUBSCRIPT = 1 << 5;
        const SUPERSCRIPT = 1 << 6;
    }
}

impl TextFormat {
    /// Build a format from the raw editor bitmask. Bits above superscript are
    /// ignored.
    pub fn from_mask(mask: u64) -> Self {
        Self::from_bits_truncate((mask & u64::from(Self::all().bits())) as u32)
    }

    /// Decorations present in this format, outermost first.
    pub fn decorations(self) -> impl DoubleEndedIterator<Item = Decoration> {
        Decoration::NESTING_ORDER
            .into_iter()
            .filter(move |decoration| self.contains(decoration.flag()))
    }
}

impl Default for TextFormat {
    fn default() -> Self {
        Self::empty()
    }
}

/// One wrapping decoration applied to a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoration {
    Bold,
    Italic,
    Strikethrough,
    Underline,
    Code,
    Subscript,
    Superscript,
}

impl Decoration {
    /// Outside-in nesting order.
    pub const NESTING_ORDER: [Decoration; 7] = [
        Decoration::Bold,
        Decoration::Italic,
        Decoration::Strikethrough,
        Decoration::Underline,
        Decoration::Code,
        Decoration::Subscript,
        Decoration::Superscript,
    ];

    pub fn flag(self) -> TextFormat {
        match self {
            Decoration::Bold => TextFormat::BOLD,
            Decoration::Italic => TextFormat::ITALIC,
            Decoration::Strikethrough => TextFormat::STRIKETHROUGH,
            Decoration::Underline => TextFormat::UNDERLINE,
            Decoration::Code => TextFormat::CODE,
            Decoration::Subscript => TextFormat::SUBSCRIPT,
            Decoration::Superscript => TextFormat::SUPERSCRIPT,
        }
    }

    /// Element name used when the decoration is rendered.
    pub fn tag(self) -> &'static str {
        match self {
            Decoration::Bold => "b",
            Decoration::Italic => "em",
            Decoration::Strikethrough => "s",
            Decoration::Underline => "u",
            Decoration::Code => "code",
            Decoration::Subscript => "sub",
            Decoration::Superscript => "sup",
        }
    }
}
