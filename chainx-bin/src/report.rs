//! All-to-all distance matrices in PHYLIP format.
use std::io::Write;

use anyhow::{Context, Result};
use log::info;
use rayon::prelude::*;

use chainx::{AnchorSet, ChainParams, Cost};

use crate::io::Record;
use crate::matches::{find_anchors, AnchorArgs, MatchIndex};

/// A square, symmetric distance matrix with a zero diagonal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    pub ids: Vec<String>,
    pub values: Vec<Vec<Cost>>,
}

impl DistanceMatrix {
    /// Fill row `i` below the diagonal with `distance(records[i], records[..i])`,
    /// in parallel over the rows.
    pub fn compute(
        records: &[Record],
        distance: impl Fn(&Record, &[Record]) -> Result<Vec<Cost>> + Sync,
    ) -> Result<Self> {
        let n = records.len();
        let rows = (0..n)
            .into_par_iter()
            .map(|i| distance(&records[i], &records[..i]))
            .collect::<Result<Vec<_>>>()?;
        let mut values = vec![vec![0; n]; n];
        for (i, row) in rows.into_iter().enumerate() {
            for (j, d) in row.into_iter().enumerate() {
                values[i][j] = d;
                values[j][i] = d;
            }
        }
        Ok(Self {
            ids: records.iter().map(|r| r.id.clone()).collect(),
            values,
        })
    }

    /// Anchor-restricted global distances between all pairs of records.
    ///
    /// Each record is indexed once and queried with all earlier records.
    pub fn all_to_all(
        records: &[Record],
        anchors: AnchorArgs,
        params: ChainParams,
    ) -> Result<Self> {
        info!("Computing all-to-all distances between {} sequences", records.len());
        Self::compute(records, |reference, earlier| {
            let index = MatchIndex::new(&reference.seq, anchors.min_len);
            earlier
                .iter()
                .map(|query| -> Result<Cost> {
                    let set = AnchorSet::new(
                        find_anchors(&index, &query.seq, anchors.anchor_type),
                        reference.coord_len()?,
                        query.coord_len()?,
                    )?;
                    let d = params.distance(&set).with_context(|| {
                        format!("Distance between {} and {}", reference.id, query.id)
                    })?;
                    Ok(d.cost)
                })
                .collect()
        })
    }

    pub fn write_phylip(&self, w: &mut impl Write) -> std::io::Result<()> {
        writeln!(w, "{}", self.ids.len())?;
        for (id, row) in self.ids.iter().zip(&self.values) {
            write!(w, "{id}")?;
            for d in row {
                write!(w, "  {d}")?;
            }
            writeln!(w)?;
        }
        Ok(())
    }
}
