use super::traits::{CableFile, ResourceNotFound};
use crate::core::models::cell::{CellError, NeuronCell, NeuronCellBuilder};
use nalgebra::Point3;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;

/// SWC structure identifier of cell-body samples.
pub const SWC_SOMA_TYPE: i64 = 1;
/// SWC structure identifier written for every non-soma sample.
pub const SWC_DENDRITE_TYPE: i64 = 3;

#[derive(Debug, Error)]
pub enum SwcError {
    #[error(transparent)]
    NotFound(#[from] ResourceNotFound),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Format error on line {line}: {kind}")]
    Format { line: usize, kind: SwcFormatErrorKind },
    #[error("File contains no samples")]
    Empty,
    #[error("Invalid cell: {0}")]
    Cell(#[from] CellError),
    #[error("Cell cannot be written as SWC: {0}")]
    Unrepresentable(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum SwcFormatErrorKind {
    #[error("Expected 7 fields (id type x y z radius parent), found {found}")]
    MissingFields { found: usize },
    #[error("Invalid integer in field '{field}' (value: '{value}')")]
    InvalidInt { field: &'static str, value: String },
    #[error("Invalid number in field '{field}' (value: '{value}')")]
    InvalidFloat { field: &'static str, value: String },
    #[error("First sample id must be 0 or 1, found {found}")]
    InvalidFirstId { found: i64 },
    #[error("Sample ids must be contiguous: expected {expected}, found {found}")]
    NonContiguousId { expected: i64, found: i64 },
    #[error("Parent {parent} does not refer to an earlier sample")]
    InvalidParent { parent: i64 },
    #[error("Radius must be finite and non-negative (value: {0})")]
    InvalidRadius(f64),
}

struct SwcRow {
    id: i64,
    kind: i64,
    position: Point3<f64>,
    radius: f64,
    parent: i64,
}

fn parse_int(token: &str, field: &'static str) -> Result<i64, SwcFormatErrorKind> {
    token.parse().map_err(|_| SwcFormatErrorKind::InvalidInt {
        field,
        value: token.to_string(),
    })
}

fn parse_float(token: &str, field: &'static str) -> Result<f64, SwcFormatErrorKind> {
    token.parse().map_err(|_| SwcFormatErrorKind::InvalidFloat {
        field,
        value: token.to_string(),
    })
}

fn parse_row(line: &str) -> Result<SwcRow, SwcFormatErrorKind> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 7 {
        return Err(SwcFormatErrorKind::MissingFields {
            found: fields.len(),
        });
    }
    let radius = parse_float(fields[5], "radius")?;
    if !radius.is_finite() || radius < 0.0 {
        return Err(SwcFormatErrorKind::InvalidRadius(radius));
    }
    Ok(SwcRow {
        id: parse_int(fields[0], "id")?,
        kind: parse_int(fields[1], "type")?,
        position: Point3::new(
            parse_float(fields[2], "x")?,
            parse_float(fields[3], "y")?,
            parse_float(fields[4], "z")?,
        ),
        radius,
        parent: parse_int(fields[6], "parent")?,
    })
}

/// Reader and writer for SWC morphology files.
///
/// Each sample line is `id type x y z radius parent`. Ids must increase by
/// one from the first sample (numbered 0 or 1) and are shifted to 0-based
/// node ids. The first sample is the root; every later sample is connected
/// to its parent. Samples of type 1 are recorded as soma nodes.
pub struct SwcFile;

impl CableFile for SwcFile {
    type Model = NeuronCell;
    type Error = SwcError;

    fn read_from(reader: &mut impl BufRead) -> Result<NeuronCell, SwcError> {
        let mut builder = NeuronCellBuilder::new();
        let mut first_id: Option<i64> = None;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let content = line.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }

            let format_err = |kind| SwcError::Format {
                line: line_num,
                kind,
            };
            let row = parse_row(content).map_err(format_err)?;

            let base = match first_id {
                Some(base) => base,
                None => {
                    if row.id != 0 && row.id != 1 {
                        return Err(format_err(SwcFormatErrorKind::InvalidFirstId {
                            found: row.id,
                        }));
                    }
                    first_id = Some(row.id);
                    row.id
                }
            };

            let expected = base + builder.node_count() as i64;
            if row.id != expected {
                return Err(format_err(SwcFormatErrorKind::NonContiguousId {
                    expected,
                    found: row.id,
                }));
            }

            let id = builder.push_node(row.radius, row.position);
            if id > 0 {
                let parent = row
                    .parent
                    .checked_sub(base)
                    .filter(|&p| p >= 0 && p < id as i64)
                    .ok_or_else(|| {
                        format_err(SwcFormatErrorKind::InvalidParent { parent: row.parent })
                    })?;
                builder.connect(id, parent as usize)?;
            }
            if row.kind == SWC_SOMA_TYPE {
                builder.mark_soma(id)?;
            }
        }

        if builder.node_count() == 0 {
            return Err(SwcError::Empty);
        }
        let cell = builder.build();
        debug!(
            "Parsed SWC cell: {} nodes, {} edges, {} soma samples.",
            cell.vertex_count(),
            cell.edge_count(),
            cell.soma_ids().len()
        );
        Ok(cell)
    }

    /// Writes the cell as a tree rooted at its first soma node (or node 0).
    ///
    /// Samples are numbered from 1 in breadth-first order so that every
    /// parent precedes its children. Cells with cycles or several connected
    /// components have no SWC representation and are rejected.
    fn write_to(cell: &NeuronCell, writer: &mut impl Write) -> Result<(), SwcError> {
        let count = cell.vertex_count();
        if count == 0 {
            return Err(SwcError::Empty);
        }
        if cell.edge_count() + 1 != count {
            return Err(SwcError::Unrepresentable(format!(
                "a tree with {} nodes needs {} edges, found {}",
                count,
                count - 1,
                cell.edge_count()
            )));
        }

        let root = cell.soma_ids().first().copied().unwrap_or(0);
        let mut parent: Vec<Option<usize>> = vec![None; count];
        let mut visited = vec![false; count];
        let mut order = Vec::with_capacity(count);
        let mut queue = VecDeque::from([root]);
        visited[root] = true;
        while let Some(id) = queue.pop_front() {
            order.push(id);
            for &n in &cell.nodes()[id].neighbor_ids {
                if !visited[n] {
                    visited[n] = true;
                    parent[n] = Some(id);
                    queue.push_back(n);
                }
            }
        }
        if order.len() != count {
            return Err(SwcError::Unrepresentable(format!(
                "only {} of {} nodes are connected to the root",
                order.len(),
                count
            )));
        }

        let mut sample_of = vec![0usize; count];
        for (i, &id) in order.iter().enumerate() {
            sample_of[id] = i + 1;
        }

        writeln!(writer, "# id type x y z radius parent")?;
        for &id in &order {
            let node = &cell.nodes()[id];
            let kind = if cell.soma_ids().contains(&id) {
                SWC_SOMA_TYPE
            } else {
                SWC_DENDRITE_TYPE
            };
            let parent_sample = parent[id].map_or(-1, |p| sample_of[p] as i64);
            writeln!(
                writer,
                "{} {} {} {} {} {} {}",
                sample_of[id],
                kind,
                node.position.x,
                node.position.y,
                node.position.z,
                node.radius,
                parent_sample
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const NEURON_SWC: &str = "\
# generated sample
1 1 0.0 0.0 0.0 5.0 -1
2 1 1.0 0.0 0.0 5.0 1
3 3 1.0 3.0 4.0 1.0 2  # first dendrite
4 3 2.0 0.0 0.0 1.0 2

5 3 3.0 0.0 0.0 0.5 4
";

    fn read_str(content: &str) -> Result<NeuronCell, SwcError> {
        SwcFile::read_from(&mut Cursor::new(content))
    }

    #[test]
    fn reads_samples_into_zero_based_cell() {
        let cell = read_str(NEURON_SWC).unwrap();

        assert_eq!(cell.vertex_count(), 5);
        assert_eq!(cell.edge_count(), 4);
        assert_eq!(cell.soma_ids(), &[0, 1]);
        assert_eq!(cell.boundary_ids(), &[0, 2, 4]);
        assert_eq!(cell.node(2).unwrap().radius, 1.0);
        assert_eq!(cell.node(1).unwrap().neighbor_ids, vec![0, 2, 3]);

        let edge = cell.edges()[1];
        assert_eq!((edge.from_id, edge.to_id), (2, 1));
        assert_eq!(edge.length, 5.0);
    }

    #[test]
    fn zero_based_ids_are_accepted() {
        let cell = read_str("0 1 0 0 0 1 -1\n1 3 0 0 2 1 0\n").unwrap();
        assert_eq!(cell.vertex_count(), 2);
        assert_eq!(cell.edges()[0].length, 2.0);
        assert_eq!(cell.average_edge_length().unwrap(), 2.0);
    }

    #[test]
    fn root_parent_is_not_turned_into_an_edge() {
        let cell = read_str("1 1 0 0 0 1 7\n").unwrap();
        assert_eq!(cell.vertex_count(), 1);
        assert_eq!(cell.edge_count(), 0);
        assert!(cell.boundary_ids().is_empty());
    }

    #[test]
    fn non_numeric_field_is_a_format_error_with_line_number() {
        let err = read_str("1 1 0 0 0 1 -1\n2 3 x 0 0 1 1\n").unwrap_err();
        match err {
            SwcError::Format { line, kind } => {
                assert_eq!(line, 2);
                assert_eq!(
                    kind,
                    SwcFormatErrorKind::InvalidFloat {
                        field: "x",
                        value: "x".into()
                    }
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn short_rows_are_rejected() {
        let err = read_str("1 1 0 0 0 1\n").unwrap_err();
        assert!(matches!(
            err,
            SwcError::Format {
                line: 1,
                kind: SwcFormatErrorKind::MissingFields { found: 6 }
            }
        ));
    }

    #[test]
    fn non_contiguous_ids_are_rejected() {
        let err = read_str("1 1 0 0 0 1 -1\n3 3 0 0 1 1 1\n").unwrap_err();
        assert!(matches!(
            err,
            SwcError::Format {
                line: 2,
                kind: SwcFormatErrorKind::NonContiguousId {
                    expected: 2,
                    found: 3
                }
            }
        ));
    }

    #[test]
    fn first_id_must_be_zero_or_one() {
        let err = read_str("5 1 0 0 0 1 -1\n").unwrap_err();
        assert!(matches!(
            err,
            SwcError::Format {
                kind: SwcFormatErrorKind::InvalidFirstId { found: 5 },
                ..
            }
        ));
    }

    #[test]
    fn later_rows_need_an_earlier_parent() {
        for body in ["1 1 0 0 0 1 -1\n2 3 0 0 1 1 -1\n", "1 1 0 0 0 1 -1\n2 3 0 0 1 1 2\n"] {
            let err = read_str(body).unwrap_err();
            assert!(matches!(
                err,
                SwcError::Format {
                    line: 2,
                    kind: SwcFormatErrorKind::InvalidParent { .. }
                }
            ));
        }
    }

    #[test]
    fn parent_far_below_first_id_is_a_format_error() {
        let err = read_str("1 1 0 0 0 1 -1\n2 3 0 0 1 1 -9223372036854775808\n").unwrap_err();
        assert!(matches!(
            err,
            SwcError::Format {
                line: 2,
                kind: SwcFormatErrorKind::InvalidParent {
                    parent: i64::MIN
                }
            }
        ));
    }

    #[test]
    fn negative_or_non_finite_radius_is_rejected() {
        for radius in ["-1", "NaN", "inf", "-inf"] {
            let err = read_str(&format!("1 1 0 0 0 {} -1\n", radius)).unwrap_err();
            assert!(
                matches!(
                    err,
                    SwcError::Format {
                        line: 1,
                        kind: SwcFormatErrorKind::InvalidRadius(_),
                    }
                ),
                "accepted radius {}",
                radius
            );
        }
    }

    #[test]
    fn empty_file_is_rejected() {
        assert!(matches!(read_str("# only comments\n\n"), Err(SwcError::Empty)));
    }

    #[test]
    fn missing_file_is_resource_not_found() {
        let dir = tempdir().unwrap();
        let err = SwcFile::read_from_path(dir.path().join("absent.swc")).unwrap_err();
        assert!(matches!(err, SwcError::NotFound(_)));
    }

    #[test]
    fn written_tree_reads_back_with_same_geometry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("neuron.swc");
        let original = read_str(NEURON_SWC).unwrap();

        SwcFile::write_to_path(&original, &path).unwrap();
        let restored = SwcFile::read_from_path(&path).unwrap();

        assert_eq!(restored.nodes(), original.nodes());
        assert_eq!(restored.soma_ids(), original.soma_ids());
        assert_eq!(restored.boundary_ids(), original.boundary_ids());
        assert_eq!(restored.total_cable_length(), original.total_cable_length());
    }

    #[test]
    fn cells_with_cycles_cannot_be_written() {
        let mut builder = NeuronCellBuilder::new();
        for i in 0..3 {
            builder.push_node(1.0, Point3::new(i as f64, 0.0, 0.0));
        }
        builder.connect(0, 1).unwrap().connect(1, 2).unwrap().connect(2, 0).unwrap();
        let err = SwcFile::write_to(&builder.build(), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, SwcError::Unrepresentable(_)));
    }

    #[test]
    fn disconnected_cells_cannot_be_written() {
        let mut builder = NeuronCellBuilder::new();
        for i in 0..4 {
            builder.push_node(1.0, Point3::new(i as f64, 0.0, 0.0));
        }
        builder.connect(0, 1).unwrap().connect(2, 3).unwrap();
        let err = SwcFile::write_to(&builder.build(), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, SwcError::Unrepresentable(_)));
        assert!(matches!(
            SwcFile::write_to(&NeuronCell::default(), &mut Vec::new()),
            Err(SwcError::Empty)
        ));
    }
}
