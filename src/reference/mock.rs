//! Mock data provider for tests and examples

use crate::coords::{GenomicPos, TranscriptPos};
use crate::error::ForgeError;
use crate::reference::provider::{
    DataProvider, IdentifierKind, IdentifierType, TranscriptSearch,
};
use crate::reference::transcript::{ExonData, Strand, TranscriptData};
use std::collections::{HashMap, HashSet};

/// In-memory provider backed by canned transcripts and sequences.
#[derive(Clone, Default)]
pub struct MockProvider {
    transcripts: HashMap<String, TranscriptData>,
    sequences: HashMap<String, String>,
    /// symbol/accession -> related accessions (gene to transcripts,
    /// transcript to protein, ...)
    links: HashMap<String, Vec<(IdentifierType, String)>>,
    gene_symbols: HashSet<String>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_transcript(&mut self, transcript: TranscriptData) {
        self.transcripts
            .insert(transcript.ac.clone(), transcript);
    }

    pub fn add_sequence(&mut self, accession: impl Into<String>, sequence: impl Into<String>) {
        self.sequences.insert(accession.into(), sequence.into());
    }

    pub fn add_link(
        &mut self,
        from: impl Into<String>,
        target_type: IdentifierType,
        to: impl Into<String>,
    ) {
        self.links
            .entry(from.into())
            .or_default()
            .push((target_type, to.into()));
    }

    pub fn add_gene_symbol(&mut self, symbol: impl Into<String>) {
        self.gene_symbols.insert(symbol.into());
    }

    /// A provider populated with the fixtures the test suites share.
    pub fn with_test_data() -> Self {
        let mut provider = Self::new();

        // NM_000051.3: plus-strand coding transcript on NC_000011.10.
        // Layout: GG | ATG (AAA x59) TAA | TTTT
        //   5' UTR n.0-1, CDS n.2-184, 3' UTR n.185-188
        // Protein: Met followed by 59 Lys.
        let tx_seq = format!("GG{}{}TAA{}", "ATG", "AAA".repeat(59), "TTTT");
        let genomic = format!("{}{}{}", "C".repeat(5000), tx_seq, "C".repeat(811));
        provider.add_transcript(TranscriptData {
            ac: "NM_000051.3".into(),
            gene: Some("ATM".into()),
            cds_start_index: Some(TranscriptPos::new(2)),
            cds_end_index: Some(TranscriptPos::new(184)),
            strand: Strand::Plus,
            reference_accession: "NC_000011.10".into(),
            exons: vec![ExonData {
                transcript_start: TranscriptPos::new(0),
                transcript_end: TranscriptPos::new(189),
                reference_start: GenomicPos::new(5000),
                reference_end: GenomicPos::new(5188),
            }],
        });
        provider.add_sequence("NM_000051.3", tx_seq);
        provider.add_sequence("NC_000011.10", genomic);
        provider.add_sequence(
            "NP_000042.3",
            format!("M{}", "K".repeat(59)),
        );
        provider.add_link(
            "NM_000051.3",
            IdentifierType::ProteinAccession,
            "NP_000042.3",
        );

        // NM_999999.1: minus-strand transcript on NC_MINUS.1, single exon
        // over g.1001-1100 (0-based 1000..=1099).
        let minus_genomic = "ACGT".repeat(500);
        let minus_tx = crate::sequence::reverse_complement(&minus_genomic[1000..1100]);
        provider.add_transcript(TranscriptData {
            ac: "NM_999999.1".into(),
            gene: Some("MINUS".into()),
            cds_start_index: Some(TranscriptPos::new(0)),
            cds_end_index: Some(TranscriptPos::new(99)),
            strand: Strand::Minus,
            reference_accession: "NC_MINUS.1".into(),
            exons: vec![ExonData {
                transcript_start: TranscriptPos::new(0),
                transcript_end: TranscriptPos::new(100),
                reference_start: GenomicPos::new(1000),
                reference_end: GenomicPos::new(1099),
            }],
        });
        provider.add_sequence("NM_999999.1", minus_tx);
        provider.add_sequence("NC_MINUS.1", minus_genomic);

        // NM_004333.4: stand-in for a BRAF transcript; gene symbol routing.
        provider.add_transcript(TranscriptData {
            ac: "NM_004333.4".into(),
            gene: Some("BRAF".into()),
            cds_start_index: Some(TranscriptPos::new(0)),
            cds_end_index: Some(TranscriptPos::new(2299)),
            strand: Strand::Plus,
            reference_accession: "NC_000007.14".into(),
            exons: vec![ExonData {
                transcript_start: TranscriptPos::new(0),
                transcript_end: TranscriptPos::new(2300),
                reference_start: GenomicPos::new(100),
                reference_end: GenomicPos::new(2399),
            }],
        });
        provider.add_sequence("NM_004333.4", "T".repeat(2300));
        provider.add_sequence("NC_000007.14", "T".repeat(2500));
        provider.add_gene_symbol("BRAF");
        provider.add_link(
            "BRAF",
            IdentifierType::TranscriptAccession,
            "NM_004333.4",
        );
        provider.add_link("BRAF", IdentifierType::GenomicAccession, "NC_000007.14");

        // Plain genomic fixtures for normalization and equivalence tests.
        provider.add_sequence("NC_TEST.1", "ACGT".repeat(500));
        // g.10 is A, flanked by C's and G's: insertion-to-duplication cases
        provider.add_sequence("NC_DUP.1", format!("{}A{}", "C".repeat(9), "G".repeat(90)));
        // A five-base T run at g.4-8 inside a short context
        provider.add_sequence("NC_RUN.1", format!("ACG{}ACG{}", "T".repeat(5), "C".repeat(89)));
        // Unbounded homopolymer
        provider.add_sequence("NC_HOMO.1", "A".repeat(2000));

        // Poly-alanine protein for duplication-ambiguity tests:
        // Met, ten Ala, then a distinct tail.
        provider.add_sequence("NP_ALA.1", format!("M{}GVSW", "A".repeat(10)));

        provider
    }
}

impl DataProvider for MockProvider {
    fn get_transcript(
        &self,
        transcript_ac: &str,
        reference_ac: Option<&str>,
    ) -> Result<TranscriptData, ForgeError> {
        let tx = self.transcripts.get(transcript_ac).ok_or_else(|| {
            ForgeError::NotFound {
                accession: transcript_ac.to_string(),
            }
        })?;
        if let Some(reference) = reference_ac {
            if reference != tx.reference_accession {
                return Err(ForgeError::NotFound {
                    accession: format!("{} on {}", transcript_ac, reference),
                });
            }
        }
        Ok(tx.clone())
    }

    fn get_seq(
        &self,
        ac: &str,
        start: i64,
        end: i64,
        _kind: IdentifierType,
    ) -> Result<String, ForgeError> {
        let seq = self
            .sequences
            .get(ac)
            .ok_or_else(|| ForgeError::NotFound {
                accession: ac.to_string(),
            })?;
        if start < 0 || (end < start && end != -1) {
            return Err(ForgeError::OutOfRange {
                accession: ac.to_string(),
                start,
                end,
            });
        }
        let len = seq.len();
        let start = (start as usize).min(len);
        let end = if end == -1 {
            len
        } else {
            (end as usize).min(len)
        };
        Ok(seq[start..end].to_string())
    }

    fn get_symbol_accessions(
        &self,
        symbol: &str,
        _source_kind: IdentifierKind,
        target_kind: IdentifierKind,
    ) -> Result<Vec<(IdentifierType, String)>, ForgeError> {
        let target = target_kind.identifier_type();
        Ok(self
            .links
            .get(symbol)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(t, _)| *t == target)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get_identifier_type(&self, identifier: &str) -> Result<IdentifierType, ForgeError> {
        if self.gene_symbols.contains(identifier) {
            return Ok(IdentifierType::GeneSymbol);
        }
        let prefix = identifier.split('_').next().unwrap_or(identifier);
        Ok(match prefix {
            "NC" | "NG" | "NT" | "NW" => IdentifierType::GenomicAccession,
            "NM" | "NR" | "XM" | "XR" => IdentifierType::TranscriptAccession,
            "NP" | "XP" => IdentifierType::ProteinAccession,
            _ => IdentifierType::Unknown,
        })
    }
}

impl TranscriptSearch for MockProvider {
    fn transcripts_for_region(
        &self,
        reference_ac: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<String>, ForgeError> {
        let mut hits: Vec<String> = self
            .transcripts
            .values()
            .filter(|tx| tx.reference_accession == reference_ac)
            .filter(|tx| {
                tx.exons.iter().any(|e| {
                    e.reference_start.value() < end && e.reference_end.value() + 1 > start
                })
            })
            .map(|tx| tx.ac.clone())
            .collect();
        hits.sort();
        Ok(hits)
    }
}
