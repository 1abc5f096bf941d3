//! Parsing, bitscore cut and pre-partition canonicalisation feeding the core
//! `mhg-graph` partitioner: the layer that turns raw BLAST XML reports into
//! an `mhg_graph::AlignmentGraph`.

pub mod bitscore;
pub mod blast;
pub mod canon;
pub mod error;

use std::fs;
use std::path::Path;

use mhg_graph::AlignmentGraph;
use tracing::info;

pub use bitscore::{
    bitscore_cut,
    DEFAULT_THRESHOLD,
};
pub use blast::{
    parse_blast_xml,
    Hsp,
};
pub use canon::build_alignment_graph;
pub use error::{
    IoError,
    IoResult,
};

/// Read and parse every `*.xml` BLAST report directly under `dir`, apply the
/// bitscore cut, and assemble the resulting alignment graph.
pub fn load_alignment_graph(dir: &Path, threshold: f64) -> IoResult<AlignmentGraph> {
    let mut hsps = Vec::new();
    let mut reports = 0usize;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("xml") {
            continue;
        }
        let xml = fs::read_to_string(&path)?;
        hsps.extend(parse_blast_xml(&xml)?);
        reports += 1;
    }

    info!(reports, hsps = hsps.len(), "parsed alignment reports");
    let hsps = bitscore_cut(hsps, threshold);
    info!(kept = hsps.len(), threshold, "bitscore cut applied");

    Ok(build_alignment_graph(&hsps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const REPORT: &str = r#"
        <BlastOutput>
          <BlastOutput_iterations>
            <Iteration>
              <Iteration_query-def>A</Iteration_query-def>
              <Iteration_hits>
                <Hit>
                  <Hit_def>B</Hit_def>
                  <Hit_hsps>
                    <Hsp>
                      <Hsp_bit-score>500.0</Hsp_bit-score>
                      <Hsp_align-len>50</Hsp_align-len>
                      <Hsp_query-from>1</Hsp_query-from>
                      <Hsp_query-to>50</Hsp_query-to>
                      <Hsp_hit-from>1</Hsp_hit-from>
                      <Hsp_hit-to>50</Hsp_hit-to>
                      <Hsp_qseq>AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA</Hsp_qseq>
                      <Hsp_hseq>AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA</Hsp_hseq>
                    </Hsp>
                  </Hit_hsps>
                </Hit>
              </Iteration_hits>
            </Iteration>
          </BlastOutput_iterations>
        </BlastOutput>
    "#;

    #[test]
    fn loads_a_directory_of_reports_into_one_graph() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = fs::File::create(dir.path().join("hit.xml")).unwrap();
        file.write_all(REPORT.as_bytes()).unwrap();

        let graph = load_alignment_graph(dir.path(), DEFAULT_THRESHOLD).unwrap();
        assert_eq!(graph.alignments().len(), 1);
    }

    #[test]
    fn ignores_non_xml_files_in_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.txt"), "not xml").unwrap();
        let graph = load_alignment_graph(dir.path(), DEFAULT_THRESHOLD).unwrap();
        assert!(graph.alignments().is_empty());
    }
}
