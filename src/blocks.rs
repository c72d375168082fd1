//! # Block Composition
//!
//! Flattens a list of content nodes into the block elements of a section,
//! header, footer or table cell. `VIEW` containers are transparent: their
//! children are compiled with the view's style cascaded over the inherited
//! one, and the resulting blocks are spliced in place of the view.

use crate::docx::Block;
use crate::image::create_image_paragraph;
use crate::model::Node;
use crate::style::{cascade, Style};
use crate::svg::create_svg_image_paragraph;
use crate::table::create_table;
use crate::text::{create_paragraph_from_string, create_paragraph_from_text};

/// Compile content nodes into blocks, in order.
pub fn render_block_nodes(nodes: &[Node], inherited: Option<&Style>) -> Vec<Block> {
    let mut blocks = Vec::new();
    for node in nodes {
        render_block_node(node, inherited, &mut blocks);
    }
    blocks
}

fn render_block_node(node: &Node, inherited: Option<&Style>, blocks: &mut Vec<Block>) {
    match node {
        Node::Text { props, children } => {
            blocks.push(Block::Paragraph(create_paragraph_from_text(props, children, inherited)));
        }
        Node::Image { props, .. } => {
            blocks.push(Block::Paragraph(create_image_paragraph(props, inherited)));
        }
        Node::Svg { props, children } => {
            blocks.push(Block::Paragraph(create_svg_image_paragraph(props, children, inherited)));
        }
        Node::Table { props, children } => {
            blocks.push(Block::Table(create_table(props, children)));
        }
        Node::View { props, children } => {
            let style = cascade(inherited, props.style.as_ref());
            for child in children {
                render_block_node(child, style.as_ref(), blocks);
            }
        }
        Node::TextInstance { text } => {
            blocks.push(Block::Paragraph(create_paragraph_from_string(text, inherited)));
        }
        other => {
            log::debug!("Skipping {} node at block level", other.type_name());
        }
    }
}
