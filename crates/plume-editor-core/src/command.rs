//! Toolbar command vocabulary.
//!
//! Every toolbar control corresponds to exactly one [`Command`]. What the
//! control looks like and what it asks of the host is described by a
//! [`CommandSpec`], so the editor never dispatches on raw strings.

use std::fmt;
use std::str::FromStr;

use crate::error::EditorError;

/// Host command that wraps the current line in a block element.
pub const FORMAT_BLOCK: &str = "formatBlock";
/// Host command that turns the selection into a link.
pub const CREATE_LINK: &str = "createLink";
/// Host command that applies one of the seven semantic font sizes.
pub const FONT_SIZE: &str = "fontSize";
/// Host command that picks the element used for new paragraphs.
pub const DEFAULT_PARAGRAPH_SEPARATOR: &str = "defaultParagraphSeparator";

/// A toolbar command the editor knows how to build a control for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Bold,
    Italic,
    Underline,
    StrikeThrough,
    RemoveFormat,
    Outdent,
    Indent,
    UnorderedList,
    OrderedList,
    JustifyLeft,
    JustifyCenter,
    JustifyRight,
    Code,
    Paragraph,
    Blockquote,
    HorizontalRule,
    CreateLink,
    Image,
    Size,
}

impl Command {
    /// Every command, in canonical toolbar order.
    pub const ALL: [Command; 19] = [
        Command::Bold,
        Command::Italic,
        Command::Underline,
        Command::StrikeThrough,
        Command::RemoveFormat,
        Command::Outdent,
        Command::Indent,
        Command::UnorderedList,
        Command::OrderedList,
        Command::JustifyLeft,
        Command::JustifyCenter,
        Command::JustifyRight,
        Command::Code,
        Command::Paragraph,
        Command::Blockquote,
        Command::HorizontalRule,
        Command::CreateLink,
        Command::Image,
        Command::Size,
    ];

    /// The configuration record for this command's control.
    pub fn spec(self) -> CommandSpec {
        match self {
            Command::Bold => CommandSpec::exec("bold", "<b>B</b>", true),
            Command::Italic => CommandSpec::exec("italic", "<i>I</i>", true),
            Command::Underline => CommandSpec::exec("underline", "<u>U</u>", true),
            Command::StrikeThrough => {
                CommandSpec::exec("strikeThrough", "<strike>S</strike>", true)
            }
            Command::RemoveFormat => CommandSpec::exec("removeFormat", "&#9003;", false),
            Command::Outdent => CommandSpec::exec("outdent", "&#8676;", true),
            Command::Indent => CommandSpec::exec("indent", "&#8677;", true),
            Command::UnorderedList => CommandSpec::exec("insertUnorderedList", "&#8226;", true),
            Command::OrderedList => CommandSpec::exec("insertOrderedList", "&#35;", true),
            Command::JustifyLeft => CommandSpec::exec("justifyLeft", "|..", true),
            Command::JustifyCenter => CommandSpec::exec("justifyCenter", ".|.", true),
            Command::JustifyRight => CommandSpec::exec("justifyRight", "..|", true),
            Command::Code => CommandSpec {
                id: "code",
                icon: "&lt;/&gt;",
                kind: CommandKind::FormatBlock(BlockTag::Pre),
                reflects_state: false,
            },
            Command::Paragraph => CommandSpec {
                id: "paragraph",
                icon: "&#182;",
                kind: CommandKind::FormatBlock(BlockTag::Paragraph),
                reflects_state: false,
            },
            Command::Blockquote => CommandSpec {
                id: "blockquote",
                icon: "&#10078;",
                kind: CommandKind::FormatBlock(BlockTag::Blockquote),
                reflects_state: false,
            },
            Command::HorizontalRule => CommandSpec::exec("insertHorizontalRule", "-", false),
            Command::CreateLink => CommandSpec {
                id: "createLink",
                icon: "&#128279;",
                kind: CommandKind::CreateLink,
                reflects_state: false,
            },
            Command::Image => CommandSpec {
                id: "image",
                icon: "&#128247;",
                kind: CommandKind::Image,
                reflects_state: false,
            },
            Command::Size => CommandSpec {
                id: "fontsize",
                icon: "",
                kind: CommandKind::FontSize,
                reflects_state: true,
            },
        }
    }

    /// Stable identifier of the control built for this command.
    pub fn id(self) -> &'static str {
        self.spec().id
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Command {
    type Err = EditorError;

    /// Parse a command name, ignoring case.
    ///
    /// Both the host spelling (`insertUnorderedList`) and the short toolbar
    /// spelling (`unorderedList`) are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let command = match s.trim().to_ascii_lowercase().as_str() {
            "bold" => Command::Bold,
            "italic" => Command::Italic,
            "underline" => Command::Underline,
            "strikethrough" => Command::StrikeThrough,
            "removeformat" => Command::RemoveFormat,
            "outdent" => Command::Outdent,
            "indent" => Command::Indent,
            "unorderedlist" | "insertunorderedlist" => Command::UnorderedList,
            "orderedlist" | "insertorderedlist" => Command::OrderedList,
            "justifyleft" => Command::JustifyLeft,
            "justifycenter" => Command::JustifyCenter,
            "justifyright" => Command::JustifyRight,
            "code" => Command::Code,
            "paragraph" => Command::Paragraph,
            "blockquote" => Command::Blockquote,
            "horizontalrule" | "inserthorizontalrule" => Command::HorizontalRule,
            "createlink" => Command::CreateLink,
            "image" => Command::Image,
            "size" | "fontsize" => Command::Size,
            _ => return Err(EditorError::UnknownCommand(s.to_string())),
        };
        Ok(command)
    }
}

/// Configuration record for one toolbar control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Element id of the visible control.
    pub id: &'static str,
    /// Markup placed inside the control.
    pub icon: &'static str,
    /// What activating the control asks of the host.
    pub kind: CommandKind,
    /// Whether the control mirrors host formatting state at the caret.
    pub reflects_state: bool,
}

impl CommandSpec {
    const fn exec(host_command: &'static str, icon: &'static str, reflects_state: bool) -> Self {
        Self {
            id: host_command,
            icon,
            kind: CommandKind::Exec(host_command),
            reflects_state,
        }
    }
}

/// The family of host operation behind a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Run the named host command with no argument.
    Exec(&'static str),
    /// Run `formatBlock` with the given block tag.
    FormatBlock(BlockTag),
    /// Prompt for a URL, then run `createLink`.
    CreateLink,
    /// Hidden file picker behind a label.
    Image,
    /// Dropdown of the seven semantic font sizes.
    FontSize,
}

/// Block element applied by `formatBlock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockTag {
    Paragraph,
    Blockquote,
    Pre,
}

impl BlockTag {
    /// Lowercase element name.
    pub fn tag_name(self) -> &'static str {
        match self {
            BlockTag::Paragraph => "p",
            BlockTag::Blockquote => "blockquote",
            BlockTag::Pre => "pre",
        }
    }

    /// Argument passed to the host's `formatBlock`.
    pub fn host_arg(self) -> &'static str {
        match self {
            BlockTag::Paragraph => "<p>",
            BlockTag::Blockquote => "<blockquote>",
            BlockTag::Pre => "<pre>",
        }
    }

    /// Parse the value the host reports for `formatBlock`.
    ///
    /// Hosts disagree on casing and on whether angle brackets are included.
    pub fn from_host_value(value: &str) -> Option<Self> {
        let name = value.trim().trim_start_matches('<').trim_end_matches('>');
        [BlockTag::Paragraph, BlockTag::Blockquote, BlockTag::Pre]
            .into_iter()
            .find(|tag| tag.tag_name().eq_ignore_ascii_case(name))
    }

    /// Blocks that swallow Enter and need an explicit escape to a paragraph.
    pub fn traps_paragraph_break(self) -> bool {
        matches!(self, BlockTag::Blockquote | BlockTag::Pre)
    }
}

/// One of the seven semantic font sizes understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontSize(u8);

const FONT_SIZE_LABELS: [&str; 7] = ["8pt", "10pt", "12pt", "14pt", "16pt", "18pt", "24pt"];

impl FontSize {
    /// Size selected before the host reports anything.
    pub const DEFAULT: FontSize = FontSize(3);

    pub fn new(level: u8) -> Option<Self> {
        (1..=7).contains(&level).then_some(Self(level))
    }

    /// All sizes, smallest first.
    pub fn all() -> impl Iterator<Item = FontSize> {
        (1..=7).map(FontSize)
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// Position of this size in the dropdown.
    pub fn index(self) -> usize {
        usize::from(self.0) - 1
    }

    pub fn label(self) -> &'static str {
        FONT_SIZE_LABELS[self.index()]
    }

    /// Parse the value the host reports for `fontSize`, falling back to
    /// [`FontSize::DEFAULT`] when it is empty or not a level.
    pub fn from_host_value(value: &str) -> Self {
        value
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::new)
            .unwrap_or(Self::DEFAULT)
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("bold".parse::<Command>().unwrap(), Command::Bold);
        assert_eq!("BOLD".parse::<Command>().unwrap(), Command::Bold);
        assert_eq!("strikeThrough".parse::<Command>().unwrap(), Command::StrikeThrough);
        assert_eq!("justifyleft".parse::<Command>().unwrap(), Command::JustifyLeft);
    }

    #[test]
    fn test_parse_accepts_host_and_short_spellings() {
        assert_eq!("unorderedList".parse::<Command>().unwrap(), Command::UnorderedList);
        assert_eq!(
            "insertUnorderedList".parse::<Command>().unwrap(),
            Command::UnorderedList
        );
        assert_eq!("horizontalrule".parse::<Command>().unwrap(), Command::HorizontalRule);
        assert_eq!("fontSize".parse::<Command>().unwrap(), Command::Size);
    }

    #[test]
    fn test_parse_unknown() {
        match "superscript".parse::<Command>() {
            Err(EditorError::UnknownCommand(name)) => assert_eq!(name, "superscript"),
            other => panic!("Expected UnknownCommand, got {other:?}"),
        }
    }

    #[test]
    fn test_every_command_round_trips_through_its_id() {
        for command in Command::ALL {
            let id = command.id();
            assert_eq!(id.parse::<Command>().unwrap(), command, "id {id}");
        }
    }

    #[test]
    fn test_fire_and_forget_commands_do_not_reflect_state() {
        for command in [
            Command::Code,
            Command::Paragraph,
            Command::Blockquote,
            Command::RemoveFormat,
            Command::HorizontalRule,
        ] {
            assert!(!command.spec().reflects_state, "{command}");
        }
        assert!(Command::Bold.spec().reflects_state);
        assert!(Command::Size.spec().reflects_state);
    }

    #[test]
    fn test_block_tag_host_values() {
        assert_eq!(BlockTag::from_host_value("blockquote"), Some(BlockTag::Blockquote));
        assert_eq!(BlockTag::from_host_value("<PRE>"), Some(BlockTag::Pre));
        assert_eq!(BlockTag::from_host_value("p"), Some(BlockTag::Paragraph));
        assert_eq!(BlockTag::from_host_value("div"), None);
        assert_eq!(BlockTag::from_host_value(""), None);
        assert!(BlockTag::Pre.traps_paragraph_break());
        assert!(!BlockTag::Paragraph.traps_paragraph_break());
    }

    #[test]
    fn test_font_size_levels() {
        let labels: Vec<_> = FontSize::all().map(FontSize::label).collect();
        assert_eq!(labels, FONT_SIZE_LABELS);
        assert_eq!(FontSize::new(0), None);
        assert_eq!(FontSize::new(8), None);
        assert_eq!(FontSize::from_host_value("5").level(), 5);
        assert_eq!(FontSize::from_host_value(""), FontSize::DEFAULT);
        assert_eq!(FontSize::from_host_value("16px"), FontSize::DEFAULT);
        assert_eq!(FontSize::DEFAULT.index(), 2);
    }
}
