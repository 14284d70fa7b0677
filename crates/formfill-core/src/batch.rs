//! Batch processing: one merged PDF per input row.
//!
//! Per row the contract page is filled, the optional terms page appended
//! and, for rows with several objects, one annex page per chunk of objects
//! added. Intermediate pages live in a temporary directory that is removed
//! when the batch ends, whether it succeeded or not.

use crate::assemble::{assemble, chunk};
use crate::calendar::local_today;
use crate::config::FormFillConfig;
use crate::error::Result;
use crate::merge::merge_sequence;
use crate::naming::{document_label, safe_filename, UniqueNames};
use crate::overlay::{AnnexOverlay, AnnexPage, ContractOverlay};
use crate::pipeline::{prepare, NormalizedRow};
use crate::template::TemplateSet;
use crate::units::parse_unit_list;
use chrono::NaiveDate;
use shared_types::{columns, BatchSummary, Row, RowFailure, RowOutput};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Name prefix of the per-batch work directory.
pub const WORKDIR_PREFIX: &str = "formfill-";

pub struct BatchRunner<'a> {
    templates: &'a TemplateSet,
    config: &'a FormFillConfig,
    today: NaiveDate,
}

/// State that lives for one `run`.
struct BatchScope {
    workdir: TempDir,
    terms_page: Option<PathBuf>,
    out_dir: PathBuf,
    names: UniqueNames,
}

impl<'a> BatchRunner<'a> {
    pub fn new(templates: &'a TemplateSet, config: &'a FormFillConfig) -> Self {
        Self {
            templates,
            config,
            today: local_today(),
        }
    }

    /// Fix the date agreement start dates are computed from.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Fill every row in order and write the results to `out_dir`.
    ///
    /// Row failures are collected in the summary; only problems that affect
    /// every row (output directory, work directory, terms page) are
    /// returned as errors. The work directory is removed in every case.
    pub fn run(&self, rows: &[Row], out_dir: &Path) -> Result<BatchSummary> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKDIR_PREFIX);
        let workdir = match &self.config.output.work_dir {
            Some(root) => {
                fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        fs::create_dir_all(out_dir)?;
        info!(
            rows = rows.len(),
            out_dir = %out_dir.display(),
            workdir = %workdir.path().display(),
            "Starting batch"
        );

        let terms_page = match &self.templates.contract_terms {
            Some(terms) => {
                let path = workdir.path().join("vv_terms.pdf");
                fs::write(&path, assemble(&[], terms)?)?;
                Some(path)
            }
            None => None,
        };

        let mut scope = BatchScope {
            workdir,
            terms_page,
            out_dir: out_dir.to_path_buf(),
            names: UniqueNames::new(),
        };
        let mut summary = BatchSummary::default();

        for (index, row) in rows.iter().enumerate() {
            let prepared = prepare(row);
            let label = document_label(&prepared);
            match self.fill_row(&mut scope, index, &prepared, &label) {
                Ok(output) => {
                    debug!(row = index, path = %output.path.display(), annex_pages = output.annex_pages, "Row written");
                    summary.outputs.push(output);
                }
                Err(e) => {
                    warn!(row = index, label = %label, error = %e, "Row skipped");
                    summary.failures.push(RowFailure {
                        row: index,
                        label,
                        error: e.to_string(),
                    });
                }
            }
        }

        if let Err(e) = scope.workdir.close() {
            warn!(error = %e, "Failed to remove work directory");
        }

        info!(
            written = summary.outputs.len(),
            failed = summary.failures.len(),
            "Batch finished"
        );
        Ok(summary)
    }

    fn fill_row(&self, scope: &mut BatchScope, index: usize, row: &NormalizedRow, label: &str) -> Result<RowOutput> {
        let config = self.config;
        let workdir = scope.workdir.path();

        let contract = ContractOverlay::new(
            &config.contract_layout,
            config.text.contract_style(),
            [config.fees.base.as_str(), config.fees.premium.as_str()],
            self.today,
        );
        let contract_path = workdir.join(format!("vv_filled_{}.pdf", index));
        fs::write(&contract_path, assemble(&contract.build(row), &self.templates.contract)?)?;

        let mut parts = vec![contract_path];
        parts.extend(scope.terms_page.clone());

        let objects = row.object_addresses();
        let mut annex_pages = 0;
        if objects.len() > 1 {
            let units = parse_unit_list(row.text(columns::UNIT_COUNT));
            let unit_total = units.iter().fold(0u64, |sum, n| sum.saturating_add(*n));
            let annex = AnnexOverlay::new(&config.annex_layout, config.text.annex_style());
            let geometry = self.templates.object_list.geometry();

            for (n, group) in chunk(&objects, config.annex.chunk_size).into_iter().enumerate() {
                let page = AnnexPage {
                    offset: group.offset,
                    objects: group.items,
                    units: window(&units, group.offset, group.items.len()),
                    postal_code: row.text(columns::OBJECT_POSTAL_CODE),
                    city: row.text(columns::OBJECT_CITY),
                    unit_total,
                };
                let path = workdir.join(format!("ol_filled_{}_{}.pdf", index, n));
                fs::write(&path, assemble(&annex.build(&page, geometry), &self.templates.object_list)?)?;
                debug!(row = index, chunk = n, first_number = group.offset + 1, objects = group.items.len(), "Annex page filled");
                parts.push(path);
                annex_pages += 1;
            }
        }

        let merged = merge_sequence(&parts)?;
        let file_name = scope
            .names
            .claim(&safe_filename(label, config.output.max_name_len));
        let path = scope.out_dir.join(file_name);
        fs::write(&path, merged)?;

        Ok(RowOutput {
            row: index,
            path,
            annex_pages,
        })
    }
}

/// `values[offset..offset + len]`, clipped to what exists.
fn window(values: &[u64], offset: usize, len: usize) -> &[u64] {
    let start = offset.min(values.len());
    let end = offset.saturating_add(len).min(values.len());
    &values[start..end]
}
