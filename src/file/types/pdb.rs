use crate::error::Failure;
use crate::file::{ExtractContext, SourceExtractor, SupportedFormat};
use crate::models::ExtractionResult;
use std::path::Path;

/// Protein Data Bank files rendered as a model / chain / residue outline
pub struct PdbExtractor;

impl PdbExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdbExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Residue {
    name: String,
    seq: String,
    insertion: String,
    hetero: bool,
}

#[derive(Debug)]
struct Chain {
    id: String,
    residues: Vec<Residue>,
}

#[derive(Debug)]
struct Model {
    serial: String,
    chains: Vec<Chain>,
}

/// Fixed-column field (1-based inclusive columns), trimmed
fn column(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    line.get(start - 1..end).map(str::trim).unwrap_or("")
}

#[derive(Debug)]
struct Structure {
    id: Option<String>,
    models: Vec<Model>,
}

fn parse(content: &str) -> Structure {
    let mut id = None;
    let mut models: Vec<Model> = Vec::new();
    let mut in_model = false;

    for line in content.lines() {
        let record = column(line, 1, 6);
        match record {
            "HEADER" => {
                let code = column(line, 63, 66);
                if !code.is_empty() {
                    id = Some(code.to_string());
                }
            }
            "MODEL" => {
                models.push(Model {
                    serial: column(line, 11, 14).to_string(),
                    chains: Vec::new(),
                });
                in_model = true;
            }
            "ENDMDL" => in_model = false,
            "ATOM" | "HETATM" => {
                if !in_model && models.is_empty() {
                    models.push(Model {
                        serial: "1".to_string(),
                        chains: Vec::new(),
                    });
                }
                let Some(model) = models.last_mut() else {
                    continue;
                };

                let chain_id = column(line, 22, 22);
                let residue = Residue {
                    name: column(line, 18, 20).to_string(),
                    seq: column(line, 23, 26).to_string(),
                    insertion: column(line, 27, 27).to_string(),
                    hetero: record == "HETATM",
                };

                let chain = match model.chains.iter().position(|c| c.id == chain_id) {
                    Some(i) => &mut model.chains[i],
                    None => {
                        model.chains.push(Chain {
                            id: chain_id.to_string(),
                            residues: Vec::new(),
                        });
                        let last = model.chains.len() - 1;
                        &mut model.chains[last]
                    }
                };

                // consecutive atoms of one residue collapse into one entry
                if chain.residues.last() != Some(&residue) {
                    chain.residues.push(residue);
                }
            }
            _ => {}
        }
    }

    Structure { id, models }
}

fn render(structure: &Structure, fallback_id: &str) -> String {
    let mut text = format!("PDB ID: {}\n", structure.id.as_deref().unwrap_or(fallback_id));
    let multi_model = structure.models.len() > 1;

    for model in &structure.models {
        if multi_model {
            text.push_str(&format!("Model: {}\n", model.serial));
        }
        for chain in &model.chains {
            text.push_str(&format!("Chain: {}\n", chain.id));
            for residue in &chain.residues {
                text.push_str(&format!(
                    "Residue: {} {}{}{}\n",
                    residue.name,
                    residue.seq,
                    residue.insertion,
                    if residue.hetero { " (hetero)" } else { "" }
                ));
            }
        }
    }

    text
}

impl SourceExtractor for PdbExtractor {
    fn extract(&self, path: &Path, _cx: &ExtractContext<'_>) -> ExtractionResult {
        let label = self.format().label();
        let content = std::fs::read_to_string(path).map_err(|e| Failure::read(label, e))?;

        let structure = parse(&content);
        if structure.models.iter().all(|m| m.chains.is_empty()) {
            return Err(Failure::read(label, "no ATOM or HETATM records"));
        }

        let fallback_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(render(&structure, &fallback_id))
    }

    fn format(&self) -> SupportedFormat {
        SupportedFormat::Pdb
    }
}
