use super::traits::{CableFile, ResourceNotFound};
use crate::core::models::grid::{Grid, GridBuilder, GridError};
use nalgebra::Point3;
use roxmltree::Node;
use std::io::{self, BufRead, Read, Write};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, trace};

const DIAMETER_ATTACHMENT_NAME: &str = "diameter";

#[derive(Debug, Error)]
pub enum UgxError {
    #[error(transparent)]
    NotFound(#[from] ResourceNotFound),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("Parse error in <{element}>: {kind}")]
    Parse {
        element: String,
        kind: UgxParseErrorKind,
    },
    #[error("Missing required element <{0}>")]
    MissingElement(&'static str),
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Invalid grid: {0}")]
    Grid(#[from] GridError),
}

#[derive(Debug, Error, PartialEq)]
pub enum UgxParseErrorKind {
    #[error("Invalid number at position {position} (value: '{value}')")]
    InvalidFloat { position: usize, value: String },
    #[error("Invalid index at position {position} (value: '{value}')")]
    InvalidIndex { position: usize, value: String },
    #[error("Unsupported coordinate dimension '{0}' (expected 1, 2 or 3)")]
    InvalidDimension(String),
    #[error("{count} values do not form complete tuples of {arity}")]
    IncompleteTuple { count: usize, arity: usize },
}

fn parse_err(element: &str, kind: UgxParseErrorKind) -> UgxError {
    UgxError::Parse {
        element: element.to_string(),
        kind,
    }
}

fn parse_values<T: FromStr>(
    node: Node,
    make_kind: fn(usize, String) -> UgxParseErrorKind,
) -> Result<Vec<T>, UgxError> {
    let element = node.tag_name().name();
    node.text()
        .unwrap_or("")
        .split_whitespace()
        .enumerate()
        .map(|(position, token)| {
            token
                .parse::<T>()
                .map_err(|_| parse_err(element, make_kind(position, token.to_string())))
        })
        .collect()
}

fn parse_floats(node: Node) -> Result<Vec<f64>, UgxError> {
    parse_values(node, |position, value| UgxParseErrorKind::InvalidFloat {
        position,
        value,
    })
}

fn parse_indices(node: Node) -> Result<Vec<usize>, UgxError> {
    parse_values(node, |position, value| UgxParseErrorKind::InvalidIndex {
        position,
        value,
    })
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

/// Reader and writer for UGX grid files.
///
/// Only the parts of the format describing 1D cable meshes are handled:
/// `<vertices>`, `<edges>`, the `diameter` vertex attachment and the subsets
/// of the first `<subset_handler>`. Faces, volumes and other attachments are
/// ignored.
pub struct UgxFile;

impl CableFile for UgxFile {
    type Model = Grid;
    type Error = UgxError;

    fn read_from(reader: &mut impl BufRead) -> Result<Grid, UgxError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        let doc = roxmltree::Document::parse(&content)?;

        let root = doc.root_element();
        if !root.has_tag_name("grid") {
            return Err(UgxError::MissingElement("grid"));
        }

        let mut builder = GridBuilder::new();

        let vertices_node = child(root, "vertices").ok_or(UgxError::MissingElement("vertices"))?;
        let dim_str = vertices_node.attribute("coords").unwrap_or("3");
        let dim: usize = match dim_str.trim().parse() {
            Ok(d @ 1..=3) => d,
            _ => {
                return Err(parse_err(
                    "vertices",
                    UgxParseErrorKind::InvalidDimension(dim_str.to_string()),
                ));
            }
        };
        let coords = parse_floats(vertices_node)?;
        if coords.len() % dim != 0 {
            return Err(parse_err(
                "vertices",
                UgxParseErrorKind::IncompleteTuple {
                    count: coords.len(),
                    arity: dim,
                },
            ));
        }
        for chunk in coords.chunks(dim) {
            let mut xyz = [0.0; 3];
            xyz[..dim].copy_from_slice(chunk);
            builder.add_vertex(Point3::new(xyz[0], xyz[1], xyz[2]));
        }

        // Grid edge index for every edge as numbered in the file.
        let mut file_edges = Vec::new();
        if let Some(edges_node) = child(root, "edges") {
            let indices = parse_indices(edges_node)?;
            if indices.len() % 2 != 0 {
                return Err(parse_err(
                    "edges",
                    UgxParseErrorKind::IncompleteTuple {
                        count: indices.len(),
                        arity: 2,
                    },
                ));
            }
            for pair in indices.chunks(2) {
                file_edges.push(builder.add_edge(pair[0], pair[1])?);
            }
        }

        for attachment in root
            .children()
            .filter(|n| n.has_tag_name("vertex_attachment"))
        {
            if attachment.attribute("name") != Some(DIAMETER_ATTACHMENT_NAME) {
                trace!(
                    "Skipping vertex attachment {:?}.",
                    attachment.attribute("name")
                );
                continue;
            }
            let diameters = parse_floats(attachment)?;
            if diameters.len() != builder.vertex_count() {
                return Err(UgxError::Inconsistency(format!(
                    "diameter attachment has {} values for {} vertices",
                    diameters.len(),
                    builder.vertex_count()
                )));
            }
            for (vertex, diameter) in diameters.into_iter().enumerate() {
                builder.set_diameter(vertex, diameter)?;
            }
        }

        if let Some(handler) = child(root, "subset_handler") {
            for subset in handler.children().filter(|n| n.has_tag_name("subset")) {
                let name = subset.attribute("name").unwrap_or_default();
                let vertices = match child(subset, "vertices") {
                    Some(node) => parse_indices(node)?,
                    None => Vec::new(),
                };
                let edges = match child(subset, "edges") {
                    Some(node) => parse_indices(node)?
                        .into_iter()
                        .map(|e| {
                            file_edges.get(e).copied().ok_or_else(|| {
                                UgxError::Inconsistency(format!(
                                    "subset '{}' references edge {} but the file has {} edges",
                                    name,
                                    e,
                                    file_edges.len()
                                ))
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                    None => Vec::new(),
                };
                builder.add_subset(name, vertices, edges)?;
            }
        }

        let grid = builder.build();
        debug!(
            "Parsed UGX grid: {} vertices, {} edges, {} subsets.",
            grid.vertex_count(),
            grid.edge_count(),
            grid.subsets().len()
        );
        Ok(grid)
    }

    fn write_to(grid: &Grid, writer: &mut impl Write) -> Result<(), UgxError> {
        let diameters: Vec<f64> = grid.vertices().iter().filter_map(|v| v.diameter).collect();
        if !diameters.is_empty() && diameters.len() != grid.vertex_count() {
            return Err(UgxError::Inconsistency(format!(
                "only {} of {} vertices carry a diameter",
                diameters.len(),
                grid.vertex_count()
            )));
        }

        writeln!(writer, r#"<?xml version="1.0" encoding="utf-8"?>"#)?;
        writeln!(writer, r#"<grid name="defGrid">"#)?;

        write!(writer, r#"<vertices coords="3">"#)?;
        write_joined(
            writer,
            grid.vertices()
                .iter()
                .flat_map(|v| [v.position.x, v.position.y, v.position.z]),
        )?;
        writeln!(writer, "</vertices>")?;

        write!(writer, "<edges>")?;
        write_joined(
            writer,
            grid.edges().iter().flat_map(|e| {
                let (a, b) = e.endpoints();
                [a, b]
            }),
        )?;
        writeln!(writer, "</edges>")?;

        if !diameters.is_empty() {
            write!(
                writer,
                r#"<vertex_attachment name="{}" type="double" passOn="0" global="1">"#,
                DIAMETER_ATTACHMENT_NAME
            )?;
            write_joined(writer, diameters)?;
            writeln!(writer, "</vertex_attachment>")?;
        }

        writeln!(writer, r#"<subset_handler name="defSH">"#)?;
        for subset in grid.subsets() {
            write!(
                writer,
                r#"<subset name="{}" state="0"><vertices>"#,
                escape_attribute(&subset.name)
            )?;
            write_joined(writer, subset.vertices.iter())?;
            write!(writer, "</vertices><edges>")?;
            write_joined(writer, subset.edges.iter())?;
            writeln!(writer, "</edges></subset>")?;
        }
        writeln!(writer, "</subset_handler>")?;
        writeln!(writer, "</grid>")?;
        Ok(())
    }
}

fn write_joined<W, I>(writer: &mut W, values: I) -> io::Result<()>
where
    W: Write + ?Sized,
    I: IntoIterator,
    I::Item: std::fmt::Display,
{
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            write!(writer, " ")?;
        }
        write!(writer, "{}", value)?;
    }
    Ok(())
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
