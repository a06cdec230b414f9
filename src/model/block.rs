use super::blocks::*;
use super::common::BlockCommon;
use crate::types::RichTextItem;
use serde::{Deserialize, Serialize};

/// Macro to reduce boilerplate in Block enum methods
macro_rules! match_all_blocks {
    ($self:expr, $pattern:pat => $result:expr) => {
        match $self {
            Block::Paragraph($pattern) => $result,
            Block::Heading1($pattern) => $result,
            Block::Heading2($pattern) => $result,
            Block::Heading3($pattern) => $result,
            Block::BulletedListItem($pattern) => $result,
            Block::NumberedListItem($pattern) => $result,
            Block::ToDo($pattern) => $result,
            Block::Toggle($pattern) => $result,
            Block::Quote($pattern) => $result,
            Block::Callout($pattern) => $result,
            Block::Code($pattern) => $result,
            Block::Equation($pattern) => $result,
            Block::Divider($pattern) => $result,
            Block::Table($pattern) => $result,
            Block::TableRow($pattern) => $result,
            Block::Image($pattern) => $result,
            Block::Audio($pattern) => $result,
            Block::Bookmark($pattern) => $result,
        }
    };
}

/// Block represents every Notion block type this pipeline can emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(ParagraphBlock),
    Heading1(Heading1Block),
    Heading2(Heading2Block),
    Heading3(Heading3Block),
    BulletedListItem(BulletedListItemBlock),
    NumberedListItem(NumberedListItemBlock),
    ToDo(ToDoBlock),
    Toggle(ToggleBlock),
    Quote(QuoteBlock),
    Callout(CalloutBlock),
    Code(CodeBlock),
    Equation(EquationBlock),
    Divider(DividerBlock),
    Table(TableBlock),
    TableRow(TableRowBlock),
    Image(ImageBlock),
    Audio(AudioBlock),
    Bookmark(BookmarkBlock),
}

impl Block {
    /// Get the block's children
    pub fn children(&self) -> &Vec<Block> {
        match_all_blocks!(self, b => &b.common.children)
    }

    /// Get mutable reference to children
    pub fn children_mut(&mut self) -> &mut Vec<Block> {
        match_all_blocks!(self, b => &mut b.common.children)
    }

    /// Check if block has children
    pub fn has_children(&self) -> bool {
        self.common().has_children
    }

    /// Get common block data
    pub fn common(&self) -> &BlockCommon {
        match_all_blocks!(self, b => &b.common)
    }

    /// Get mutable common block data
    pub fn common_mut(&mut self) -> &mut BlockCommon {
        match_all_blocks!(self, b => &mut b.common)
    }

    /// Set children, keeping `has_children` in sync
    pub fn set_children(&mut self, children: Vec<Block>) {
        self.common_mut().set_children(children);
    }

    /// Get the wire-format block type tag
    pub fn block_type(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Heading1(_) => "heading_1",
            Block::Heading2(_) => "heading_2",
            Block::Heading3(_) => "heading_3",
            Block::BulletedListItem(_) => "bulleted_list_item",
            Block::NumberedListItem(_) => "numbered_list_item",
            Block::ToDo(_) => "to_do",
            Block::Toggle(_) => "toggle",
            Block::Quote(_) => "quote",
            Block::Callout(_) => "callout",
            Block::Code(_) => "code",
            Block::Equation(_) => "equation",
            Block::Divider(_) => "divider",
            Block::Table(_) => "table",
            Block::TableRow(_) => "table_row",
            Block::Image(_) => "image",
            Block::Audio(_) => "audio",
            Block::Bookmark(_) => "bookmark",
        }
    }

    /// The rich text this block carries directly, if any.
    ///
    /// Table rows hold their text inside `cells` and are handled
    /// separately by callers that care about cell content.
    pub fn rich_text(&self) -> Option<&[RichTextItem]> {
        match self {
            Block::Paragraph(b) => Some(&b.content.rich_text),
            Block::Heading1(b) => Some(&b.content.rich_text),
            Block::Heading2(b) => Some(&b.content.rich_text),
            Block::Heading3(b) => Some(&b.content.rich_text),
            Block::BulletedListItem(b) => Some(&b.content.rich_text),
            Block::NumberedListItem(b) => Some(&b.content.rich_text),
            Block::ToDo(b) => Some(&b.content.rich_text),
            Block::Toggle(b) => Some(&b.content.rich_text),
            Block::Quote(b) => Some(&b.content.rich_text),
            Block::Callout(b) => Some(&b.content.rich_text),
            Block::Code(b) => Some(&b.content.rich_text),
            Block::Equation(_)
            | Block::Divider(_)
            | Block::Table(_)
            | Block::TableRow(_)
            | Block::Image(_)
            | Block::Audio(_)
            | Block::Bookmark(_) => None,
        }
    }

    /// Whether the API accepts nested children under this block type.
    pub fn supports_children(&self) -> bool {
        matches!(
            self,
            Block::Paragraph(_)
                | Block::BulletedListItem(_)
                | Block::NumberedListItem(_)
                | Block::ToDo(_)
                | Block::Toggle(_)
                | Block::Quote(_)
                | Block::Callout(_)
                | Block::Table(_)
        )
    }

    /// Whether this block is meaningful with no text content at all.
    pub fn is_structural(&self) -> bool {
        matches!(self, Block::Divider(_) | Block::Table(_) | Block::TableRow(_))
    }
}

// Builder constructors — the vocabulary the converter speaks. Each takes
// already-built rich text and returns a block with consistent `common`.
impl Block {
    pub fn paragraph(rich_text: Vec<RichTextItem>) -> Self {
        Block::Paragraph(ParagraphBlock {
            common: BlockCommon::new(),
            content: TextBlockContent::new(rich_text),
        })
    }

    pub fn heading(level: u8, rich_text: Vec<RichTextItem>) -> Self {
        let content = TextBlockContent::new(rich_text);
        match level {
            1 => Block::Heading1(Heading1Block {
                common: BlockCommon::new(),
                content,
            }),
            2 => Block::Heading2(Heading2Block {
                common: BlockCommon::new(),
                content,
            }),
            _ => Block::Heading3(Heading3Block {
                common: BlockCommon::new(),
                content,
            }),
        }
    }

    pub fn bulleted_list_item(rich_text: Vec<RichTextItem>) -> Self {
        Block::BulletedListItem(BulletedListItemBlock {
            common: BlockCommon::new(),
            content: TextBlockContent::new(rich_text),
        })
    }

    pub fn numbered_list_item(rich_text: Vec<RichTextItem>) -> Self {
        Block::NumberedListItem(NumberedListItemBlock {
            common: BlockCommon::new(),
            content: TextBlockContent::new(rich_text),
        })
    }

    pub fn to_do(rich_text: Vec<RichTextItem>, checked: bool) -> Self {
        Block::ToDo(ToDoBlock {
            common: BlockCommon::new(),
            content: TextBlockContent::new(rich_text),
            checked,
        })
    }

    pub fn toggle(rich_text: Vec<RichTextItem>) -> Self {
        Block::Toggle(ToggleBlock {
            common: BlockCommon::new(),
            content: TextBlockContent::new(rich_text),
        })
    }

    pub fn quote(rich_text: Vec<RichTextItem>) -> Self {
        Block::Quote(QuoteBlock {
            common: BlockCommon::new(),
            content: TextBlockContent::new(rich_text),
        })
    }

    pub fn callout(rich_text: Vec<RichTextItem>, icon: Option<Icon>) -> Self {
        Block::Callout(CalloutBlock {
            common: BlockCommon::new(),
            icon,
            content: TextBlockContent::new(rich_text),
        })
    }

    pub fn code(body: Vec<RichTextItem>, language: impl Into<String>) -> Self {
        Block::Code(CodeBlock {
            common: BlockCommon::new(),
            language: language.into(),
            caption: Vec::new(),
            content: TextBlockContent::new(body),
        })
    }

    pub fn equation(expression: impl Into<String>) -> Self {
        Block::Equation(EquationBlock {
            common: BlockCommon::new(),
            expression: expression.into(),
        })
    }

    pub fn divider() -> Self {
        Block::Divider(DividerBlock::default())
    }

    pub fn table(table_width: usize, has_column_header: bool, rows: Vec<Block>) -> Self {
        Block::Table(TableBlock {
            common: BlockCommon::new().with_children(rows),
            table_width,
            has_column_header,
            has_row_header: false,
        })
    }

    pub fn table_row(cells: Vec<Vec<RichTextItem>>) -> Self {
        Block::TableRow(TableRowBlock {
            common: BlockCommon::new(),
            cells,
        })
    }

    pub fn image(url: impl Into<String>, caption: Vec<RichTextItem>) -> Self {
        Block::Image(ImageBlock {
            common: BlockCommon::new(),
            image: FileObject::external(url),
            caption,
        })
    }

    pub fn audio(url: impl Into<String>) -> Self {
        Block::Audio(AudioBlock {
            common: BlockCommon::new(),
            audio: FileObject::external(url),
            caption: Vec::new(),
        })
    }

    pub fn bookmark(url: impl Into<String>) -> Self {
        Block::Bookmark(BookmarkBlock {
            common: BlockCommon::new(),
            url: url.into(),
            caption: Vec::new(),
        })
    }
}
