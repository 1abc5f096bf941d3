//! BLAST-XML parsing into flat alignment records (`parseBlastXML` in the
//! original reference).

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{
    IoError,
    IoResult,
};

/// One high-scoring pair between a query and a subject sequence, as read
/// straight off a BLAST XML report, before the bitscore cut or pre-partition
/// canonicalisation run.
#[derive(Clone, Debug, Default)]
pub struct Hsp {
    pub query_id: String,
    pub subject_id: String,
    pub q_start: u64,
    pub q_end: u64,
    pub s_start: u64,
    pub s_end: u64,
    pub bit_score: f64,
    pub align_len: u64,
    /// Aligned query string, gaps as `-`.
    pub qseq: String,
    /// Aligned subject string, gaps as `-`.
    pub hseq: String,
}

#[derive(Default)]
struct HspBuilder {
    hsp: Hsp,
    text: String,
}

/// Parse every `Hsp` out of a BLAST XML report. Query id is read once per
/// `Iteration` (`Iteration_query-def`), subject id once per `Hit`
/// (`Hit_def`), and both are carried down onto every `Hsp` under them.
pub fn parse_blast_xml(xml: &str) -> IoResult<Vec<Hsp>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut out = Vec::new();

    let mut query_id = String::new();
    let mut subject_id = String::new();
    let mut current: Option<HspBuilder> = None;
    let mut tag_stack: Vec<String> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "Hsp" {
                    current = Some(HspBuilder::default());
                }
                tag_stack.push(name);
            }
            Event::Text(e) => {
                if let Some(tag) = tag_stack.last() {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    match tag.as_str() {
                        "Iteration_query-def" => query_id = first_token(&text),
                        "Hit_def" => subject_id = first_token(&text),
                        _ => {
                            if let Some(builder) = current.as_mut() {
                                builder.text = text;
                            }
                        }
                    }
                }
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if let Some(builder) = current.as_mut() {
                    apply_field(builder, &name)?;
                }
                if name == "Hsp" {
                    if let Some(builder) = current.take() {
                        let mut hsp = builder.hsp;
                        hsp.query_id = query_id.clone();
                        hsp.subject_id = subject_id.clone();
                        out.push(hsp);
                    }
                }
                tag_stack.pop();
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

fn first_token(s: &str) -> String {
    s.split_whitespace().next().unwrap_or(s).to_string()
}

fn apply_field(builder: &mut HspBuilder, tag: &str) -> IoResult<()> {
    let text = std::mem::take(&mut builder.text);
    if text.is_empty() {
        return Ok(());
    }
    match tag {
        "Hsp_query-from" => builder.hsp.q_start = parse_u64(tag, &text)?,
        "Hsp_query-to" => builder.hsp.q_end = parse_u64(tag, &text)?,
        "Hsp_hit-from" => builder.hsp.s_start = parse_u64(tag, &text)?,
        "Hsp_hit-to" => builder.hsp.s_end = parse_u64(tag, &text)?,
        "Hsp_bit-score" => {
            builder.hsp.bit_score = text
                .parse()
                .map_err(|_| IoError::Malformed(format!("Hsp_bit-score: {text}")))?
        }
        "Hsp_align-len" => builder.hsp.align_len = parse_u64(tag, &text)?,
        "Hsp_qseq" => builder.hsp.qseq = text,
        "Hsp_hseq" => builder.hsp.hseq = text,
        _ => {}
    }
    Ok(())
}

fn parse_u64(tag: &str, text: &str) -> IoResult<u64> {
    text.parse().map_err(|_| IoError::Malformed(format!("{tag}: {text}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <BlastOutput>
          <BlastOutput_iterations>
            <Iteration>
              <Iteration_query-def>seq1 description</Iteration_query-def>
              <Iteration_hits>
                <Hit>
                  <Hit_def>seq2 description</Hit_def>
                  <Hit_hsps>
                    <Hsp>
                      <Hsp_bit-score>150.5</Hsp_bit-score>
                      <Hsp_align-len>100</Hsp_align-len>
                      <Hsp_query-from>1</Hsp_query-from>
                      <Hsp_query-to>100</Hsp_query-to>
                      <Hsp_hit-from>1</Hsp_hit-from>
                      <Hsp_hit-to>100</Hsp_hit-to>
                      <Hsp_qseq>ACGT</Hsp_qseq>
                      <Hsp_hseq>AC-T</Hsp_hseq>
                    </Hsp>
                  </Hit_hsps>
                </Hit>
              </Iteration_hits>
            </Iteration>
          </BlastOutput_iterations>
        </BlastOutput>
    "#;

    #[test]
    fn parses_a_single_hsp() {
        let hsps = parse_blast_xml(SAMPLE).unwrap();
        assert_eq!(hsps.len(), 1);
        let hsp = &hsps[0];
        assert_eq!(hsp.query_id, "seq1");
        assert_eq!(hsp.subject_id, "seq2");
        assert_eq!(hsp.q_start, 1);
        assert_eq!(hsp.q_end, 100);
        assert_eq!(hsp.hseq, "AC-T");
    }
}
