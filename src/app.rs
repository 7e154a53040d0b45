//! Main application state and UI

use eframe::egui;
use log::{debug, info, warn};

use labbench::{
    design_primers_with, digest_report, mix_summary, normalize_dna, normalize_protein,
    parse_sequence_input, pcr_yield, AnalysisParams, Enzyme, MeltingModel, MixSummary,
    PeptideIon, PrimerCandidate, PrimerConstraints, PrimerPair, ReagentSpec, SessionResults, Wallace,
};

const VALID_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 200, 100);
const INVALID_COLOR: egui::Color32 = egui::Color32::RED;
const NO_MATCH_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 180, 100);

/// Application state
pub struct LabbenchApp {
    params: AnalysisParams,
    max_charge: i32,

    // Primer design tab
    dna_input: String,
    dna_status: InputStatus,
    primer_result: Option<PrimerPair>,
    primer_error: Option<String>,
    primer_no_match: bool,

    // Protein digest tab
    protein_input: String,
    protein_status: InputStatus,
    peptides: Vec<PeptideIon>,
    digest_error: Option<String>,

    // PCR mix tab
    reagents: Vec<ReagentSpec>,
    new_reagent: ReagentSpec,
    mix: Option<MixSummary>,
    mix_error: Option<String>,
    initial_copies: f64,
    cycles: u32,

    // View state
    current_tab: Tab,

    // Save/Load
    save_error: Option<String>,
    load_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Primers,
    Digest,
    Mix,
}

/// Validation state of a sequence text box
#[derive(Debug, Clone, PartialEq)]
enum InputStatus {
    Empty,
    Valid { name: String, length: usize },
    Invalid(String),
}

impl InputStatus {
    fn show(&self, ui: &mut egui::Ui, unit: &str) {
        match self {
            Self::Empty => {}
            Self::Valid { name, length } => {
                ui.colored_label(VALID_COLOR, format!("{} ({} {})", name, length, unit));
            }
            Self::Invalid(error) => {
                ui.colored_label(INVALID_COLOR, format!("Error: {}", error));
            }
        }
    }

    fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

impl Default for LabbenchApp {
    fn default() -> Self {
        let params = AnalysisParams::default();
        let max_charge = params.charge_states.iter().copied().max().unwrap_or(3);
        let mut app = Self {
            params,
            max_charge,
            dna_input: String::new(),
            dna_status: InputStatus::Empty,
            primer_result: None,
            primer_error: None,
            primer_no_match: false,
            protein_input: String::new(),
            protein_status: InputStatus::Empty,
            peptides: Vec::new(),
            digest_error: None,
            reagents: default_reagents(),
            new_reagent: ReagentSpec::new("", 10.0, 1.0),
            mix: None,
            mix_error: None,
            initial_copies: 1000.0,
            cycles: 30,
            current_tab: Tab::Primers,
            save_error: None,
            load_error: None,
        };
        app.refresh_mix();
        app
    }
}

impl LabbenchApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::default()
    }

    fn validate_dna_input(&mut self) {
        self.dna_status = validate_input(&self.dna_input, |s| normalize_dna(s).map(|n| n.len()));
    }

    fn validate_protein_input(&mut self) {
        self.protein_status =
            validate_input(&self.protein_input, |s| normalize_protein(s).map(|n| n.len()));
    }

    fn run_primer_design(&mut self) {
        self.primer_result = None;
        self.primer_error = None;
        self.primer_no_match = false;

        let input = match parse_sequence_input(&self.dna_input) {
            Ok(input) => input,
            Err(e) => {
                self.primer_error = Some(e.to_string());
                return;
            }
        };

        let params = self.params.primer_params();
        info!(
            "designing primers for '{}' ({} chars, length {})",
            input.name,
            input.sequence.len(),
            params.primer_length
        );
        match design_primers_with(&input.sequence, &params, &Wallace) {
            Ok(pair) => {
                debug!("accepted pair at offset {}", pair.offset);
                self.primer_result = Some(pair);
            }
            Err(e) => {
                info!("primer design finished without a pair: {}", e);
                self.primer_no_match = e.is_terminal_outcome();
                self.primer_error = Some(e.to_string());
            }
        }
    }

    fn run_digest(&mut self) {
        self.peptides.clear();
        self.digest_error = None;
        self.params.charge_states = (1..=self.max_charge).collect();

        let input = match parse_sequence_input(&self.protein_input) {
            Ok(input) => input,
            Err(e) => {
                self.digest_error = Some(e.to_string());
                return;
            }
        };

        info!("digesting '{}' with {}", input.name, self.params.enzyme);
        match digest_report(&input.sequence, self.params.enzyme, &self.params.charge_states) {
            Ok(rows) => {
                debug!("{} peptides generated", rows.len());
                self.peptides = rows;
            }
            Err(e) => {
                warn!("digestion failed: {}", e);
                self.digest_error = Some(e.to_string());
            }
        }
    }

    fn refresh_mix(&mut self) {
        match mix_summary(&self.reagents, self.params.final_volume, self.params.reactions) {
            Ok(mix) => {
                self.mix = Some(mix);
                self.mix_error = None;
            }
            Err(e) => {
                self.mix = None;
                self.mix_error = Some(e.to_string());
            }
        }
    }

    fn session_results(&self) -> SessionResults {
        SessionResults {
            params: self.params.clone(),
            primers: self.primer_result.clone(),
            peptides: self.peptides.clone(),
            mix: self.mix.clone(),
            pcr_yield: Some(pcr_yield(self.initial_copies, self.cycles)),
        }
    }

    fn save_results(&mut self) {
        let results = self.session_results();

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("labbench_results.json")
            .save_file()
        {
            match serde_json::to_string_pretty(&results) {
                Ok(json) => {
                    if let Err(e) = std::fs::write(&path, json) {
                        warn!("failed to write {}: {}", path.display(), e);
                        self.save_error = Some(format!("Failed to write file: {}", e));
                    } else {
                        info!("results saved to {}", path.display());
                        self.save_error = None;
                    }
                }
                Err(e) => {
                    self.save_error = Some(format!("Failed to serialize: {}", e));
                }
            }
        }
    }

    fn load_params(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        {
            match std::fs::read_to_string(&path) {
                Ok(json) => match AnalysisParams::from_json(&json) {
                    Ok(params) => {
                        info!("parameters loaded from {}", path.display());
                        self.max_charge = params.charge_states.iter().copied().max().unwrap_or(3);
                        self.params = params;
                        self.load_error = None;
                        self.refresh_mix();
                    }
                    Err(e) => {
                        self.load_error = Some(format!("Failed to parse: {}", e));
                    }
                },
                Err(e) => {
                    warn!("failed to read {}: {}", path.display(), e);
                    self.load_error = Some(format!("Failed to read file: {}", e));
                }
            }
        }
    }

    fn load_sequence_file(&mut self, tab: Tab) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("FASTA", &["fasta", "fa", "fna", "faa", "fas", "txt"])
            .pick_file()
        {
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    info!("loaded sequence file {}", path.display());
                    match tab {
                        Tab::Digest => {
                            self.protein_input = content;
                            self.validate_protein_input();
                        }
                        _ => {
                            self.dna_input = content;
                            self.validate_dna_input();
                        }
                    }
                }
                Err(e) => {
                    warn!("failed to read {}: {}", path.display(), e);
                    self.load_error = Some(format!("Failed to read file: {}", e));
                }
            }
        }
    }
}

impl eframe::App for LabbenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Load DNA Sequence...").clicked() {
                        self.load_sequence_file(Tab::Primers);
                        ui.close_menu();
                    }
                    if ui.button("Load Protein Sequence...").clicked() {
                        self.load_sequence_file(Tab::Digest);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Load Parameters...").clicked() {
                        self.load_params();
                        ui.close_menu();
                    }
                    if ui.button("Save Results...").clicked() {
                        self.save_results();
                        ui.close_menu();
                    }
                });
            });
        });

        // Tab bar
        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.current_tab, Tab::Primers, "Primer Design");
                ui.selectable_value(&mut self.current_tab, Tab::Digest, "Protein Digest");
                ui.selectable_value(&mut self.current_tab, Tab::Mix, "PCR Mix");
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mut parts = Vec::new();
                if let Some(ref pair) = self.primer_result {
                    parts.push(format!("Primers: {} bp amplicon", pair.amplicon_length()));
                }
                if !self.peptides.is_empty() {
                    parts.push(format!("Peptides: {}", self.peptides.len()));
                }
                if let Some(ref mix) = self.mix {
                    parts.push(format!("Master mix: {:.2} µL", mix.total_volume));
                }
                if parts.is_empty() {
                    ui.label("Enter a sequence to begin");
                } else {
                    ui.label(parts.join(" | "));
                }

                if let Some(ref error) = self.save_error {
                    ui.colored_label(INVALID_COLOR, error);
                }
                if let Some(ref error) = self.load_error {
                    ui.colored_label(INVALID_COLOR, error);
                }
            });
        });

        // Main content
        egui::CentralPanel::default().show(ctx, |ui| {
            match self.current_tab {
                Tab::Primers => self.show_primer_tab(ui),
                Tab::Digest => self.show_digest_tab(ui),
                Tab::Mix => self.show_mix_tab(ui),
            }
        });
    }
}

impl LabbenchApp {
    fn show_primer_tab(&mut self, ui: &mut egui::Ui) {
        ui.heading("Primer Design");
        ui.separator();

        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.heading("Template Sequence");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Clear").clicked() {
                        self.dna_input.clear();
                        self.dna_status = InputStatus::Empty;
                        self.primer_result = None;
                        self.primer_error = None;
                    }
                    if ui.button("Load File").clicked() {
                        self.load_sequence_file(Tab::Primers);
                    }
                    if ui.button("Load Example").clicked() {
                        self.dna_input = EXAMPLE_TEMPLATE.to_string();
                        self.validate_dna_input();
                    }
                });
            });

            ui.label("Forward strand 5'→3', FASTA or plain text (A, C, G, T only):");

            egui::ScrollArea::vertical()
                .id_salt("dna_scroll")
                .max_height(160.0)
                .show(ui, |ui| {
                    let response = ui.add(
                        egui::TextEdit::multiline(&mut self.dna_input)
                            .font(egui::TextStyle::Monospace)
                            .desired_width(f32::INFINITY)
                            .desired_rows(6),
                    );
                    if response.changed() {
                        self.validate_dna_input();
                    }
                });

            self.dna_status.show(ui, "bp");
        });

        ui.add_space(5.0);

        ui.group(|ui| {
            ui.heading("Constraints");

            ui.horizontal(|ui| {
                ui.label("Primer length:");
                ui.add(egui::DragValue::new(&mut self.params.primer_length).range(1..=60));
                ui.add_space(20.0);
                ui.label(format!("Tm model: {}", Wallace.name()));
            });
            ui.horizontal(|ui| {
                ui.label("GC% range:");
                ui.add(egui::DragValue::new(&mut self.params.constraints.min_gc).range(0.0..=100.0));
                ui.label("to");
                ui.add(egui::DragValue::new(&mut self.params.constraints.max_gc).range(0.0..=100.0));
            });
            ui.horizontal(|ui| {
                ui.label("Tm range (°C):");
                ui.add(egui::DragValue::new(&mut self.params.constraints.min_tm).range(0.0..=120.0));
                ui.label("to");
                ui.add(egui::DragValue::new(&mut self.params.constraints.max_tm).range(0.0..=120.0));
            });
            ui.horizontal(|ui| {
                ui.label("Max Tm difference (°C):");
                ui.add(egui::DragValue::new(&mut self.params.constraints.max_tm_difference).range(0.0..=50.0));
            });
        });

        ui.add_space(10.0);

        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.dna_status.is_valid(), egui::Button::new("Design Primers"))
                .clicked()
            {
                self.run_primer_design();
            }
        });

        if let Some(ref error) = self.primer_error {
            let color = if self.primer_no_match { NO_MATCH_COLOR } else { INVALID_COLOR };
            ui.colored_label(color, error);
        }

        if let Some(ref pair) = self.primer_result {
            ui.add_space(5.0);
            ui.group(|ui| {
                ui.heading("Primer Pair");
                egui::Grid::new("primer_grid")
                    .striped(true)
                    .min_col_width(60.0)
                    .show(ui, |ui| {
                        ui.strong("Primer");
                        ui.strong("Sequence (5'→3')");
                        ui.strong("Position");
                        ui.strong("GC%");
                        ui.strong("Tm (°C)");
                        ui.end_row();

                        primer_row(ui, "Forward", &pair.forward);
                        primer_row(ui, "Reverse", &pair.reverse);
                    });
                ui.label(format!(
                    "Amplicon: {} bp | ΔTm: {:.1} °C | scan offset {}",
                    pair.amplicon_length(),
                    pair.tm_difference(),
                    pair.offset
                ));
                let standard = PrimerConstraints::default();
                if !standard.tm_difference_ok(pair.tm_difference()) {
                    ui.colored_label(
                        NO_MATCH_COLOR,
                        format!(
                            "Warning: ΔTm above {:.0} °C, primers may anneal unevenly",
                            standard.max_tm_difference
                        ),
                    );
                }
            });
        }
    }

    fn show_digest_tab(&mut self, ui: &mut egui::Ui) {
        ui.heading("Protein Digest");
        ui.separator();

        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.heading("Protein Sequence");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Clear").clicked() {
                        self.protein_input.clear();
                        self.protein_status = InputStatus::Empty;
                        self.peptides.clear();
                        self.digest_error = None;
                    }
                    if ui.button("Load File").clicked() {
                        self.load_sequence_file(Tab::Digest);
                    }
                    if ui.button("Load Example").clicked() {
                        self.protein_input = EXAMPLE_PROTEIN.to_string();
                        self.validate_protein_input();
                    }
                });
            });

            ui.label("Single-letter amino acid code, FASTA or plain text:");

            egui::ScrollArea::vertical()
                .id_salt("protein_scroll")
                .max_height(120.0)
                .show(ui, |ui| {
                    let response = ui.add(
                        egui::TextEdit::multiline(&mut self.protein_input)
                            .font(egui::TextStyle::Monospace)
                            .desired_width(f32::INFINITY)
                            .desired_rows(4),
                    );
                    if response.changed() {
                        self.validate_protein_input();
                    }
                });

            self.protein_status.show(ui, "aa");
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.label("Enzyme:");
            egui::ComboBox::from_id_salt("enzyme")
                .selected_text(self.params.enzyme.name())
                .show_ui(ui, |ui| {
                    for enzyme in Enzyme::ALL {
                        ui.selectable_value(&mut self.params.enzyme, enzyme, enzyme.name());
                    }
                });
            ui.label(self.params.enzyme.description());
            ui.add_space(20.0);
            ui.label("Charge states up to:");
            ui.add(egui::DragValue::new(&mut self.max_charge).range(1..=10));
        });

        ui.add_space(5.0);

        if ui
            .add_enabled(self.protein_status.is_valid(), egui::Button::new("Digest Protein & Calculate m/z"))
            .clicked()
        {
            self.run_digest();
        }

        if let Some(ref error) = self.digest_error {
            ui.colored_label(INVALID_COLOR, error);
        }

        if self.peptides.is_empty() {
            return;
        }

        ui.separator();
        ui.label(format!("Digestion complete: {} peptides", self.peptides.len()));

        egui::ScrollArea::both().id_salt("peptide_scroll").show(ui, |ui| {
            egui::Grid::new("peptide_grid")
                .striped(true)
                .min_col_width(70.0)
                .show(ui, |ui| {
                    ui.strong("#");
                    ui.strong("Peptide");
                    ui.strong("Length");
                    ui.strong("Mass (Da)");
                    if let Some(first) = self.peptides.first() {
                        for state in &first.charge_states {
                            ui.strong(format!("m/z (+{})", state.charge));
                        }
                    }
                    ui.end_row();

                    for (i, row) in self.peptides.iter().enumerate() {
                        ui.label(format!("{}", i + 1));
                        ui.label(egui::RichText::new(&row.sequence).monospace());
                        ui.label(format!("{}", row.length));
                        ui.label(format!("{:.4}", row.mass));
                        for state in &row.charge_states {
                            ui.label(format!("{:.4}", state.mz));
                        }
                        ui.end_row();
                    }
                });
        });
    }

    fn show_mix_tab(&mut self, ui: &mut egui::Ui) {
        ui.heading("PCR Reaction Setup");
        ui.separator();

        let mut changed = false;

        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label("Final volume per reaction (µL):");
                changed |= ui
                    .add(egui::DragValue::new(&mut self.params.final_volume).range(0.1..=1000.0).speed(0.5))
                    .changed();
                ui.add_space(20.0);
                ui.label("Number of reactions:");
                changed |= ui
                    .add(egui::DragValue::new(&mut self.params.reactions).range(1..=384))
                    .changed();
            });
        });

        ui.add_space(5.0);

        ui.group(|ui| {
            ui.heading("Reagents");
            let mut remove = None;
            egui::Grid::new("reagent_input_grid").striped(true).show(ui, |ui| {
                ui.strong("Reagent");
                ui.strong("Stock (C1)");
                ui.strong("Final (C2)");
                ui.label("");
                ui.end_row();

                for (i, reagent) in self.reagents.iter_mut().enumerate() {
                    changed |= ui.text_edit_singleline(&mut reagent.name).changed();
                    changed |= ui
                        .add(egui::DragValue::new(&mut reagent.stock_concentration).speed(0.1))
                        .changed();
                    changed |= ui
                        .add(egui::DragValue::new(&mut reagent.final_concentration).speed(0.05))
                        .changed();
                    if ui.button("Remove").clicked() {
                        remove = Some(i);
                    }
                    ui.end_row();
                }

                ui.text_edit_singleline(&mut self.new_reagent.name);
                ui.add(egui::DragValue::new(&mut self.new_reagent.stock_concentration).speed(0.1));
                ui.add(egui::DragValue::new(&mut self.new_reagent.final_concentration).speed(0.05));
                if ui
                    .add_enabled(!self.new_reagent.name.trim().is_empty(), egui::Button::new("Add"))
                    .clicked()
                {
                    let mut reagent = std::mem::replace(
                        &mut self.new_reagent,
                        ReagentSpec::new("", 10.0, 1.0),
                    );
                    reagent.name = reagent.name.trim().to_string();
                    self.reagents.push(reagent);
                    changed = true;
                }
                ui.end_row();
            });

            if let Some(i) = remove {
                self.reagents.remove(i);
                changed = true;
            }
        });

        if changed {
            self.refresh_mix();
        }

        ui.add_space(5.0);

        if let Some(ref error) = self.mix_error {
            ui.colored_label(INVALID_COLOR, format!("Error: {}", error));
        }

        if let Some(ref mix) = self.mix {
            ui.group(|ui| {
                ui.heading("Reaction Mix");
                egui::Grid::new("mix_grid")
                    .striped(true)
                    .min_col_width(80.0)
                    .show(ui, |ui| {
                        ui.strong("Reagent");
                        ui.strong("Stock (C1)");
                        ui.strong("Final (C2)");
                        ui.strong("Vol/Reaction (µL)");
                        ui.strong("Total (µL)");
                        ui.end_row();

                        for entry in &mix.entries {
                            ui.label(&entry.name);
                            ui.label(format!("{}", entry.stock_concentration));
                            ui.label(format!("{}", entry.final_concentration));
                            ui.label(format!("{:.2}", entry.volume_per_reaction));
                            ui.label(format!("{:.2}", entry.total_volume));
                            ui.end_row();
                        }

                        ui.label("Nuclease-free water");
                        ui.label("—");
                        ui.label("—");
                        ui.label(format!("{:.2}", mix.water_per_reaction));
                        ui.label(format!("{:.2}", mix.water_total));
                        ui.end_row();
                    });
                ui.label(format!(
                    "Total per reaction: {:.2} µL | Total master mix: {:.2} µL",
                    mix.final_volume, mix.total_volume
                ));
            });
        }

        ui.add_space(10.0);

        ui.group(|ui| {
            ui.heading("Theoretical Yield");
            ui.horizontal(|ui| {
                ui.label("Initial copies (N₀):");
                ui.add(egui::DragValue::new(&mut self.initial_copies).range(0.0..=1e12).speed(10.0));
                ui.add_space(20.0);
                ui.label("Cycles:");
                ui.add(egui::DragValue::new(&mut self.cycles).range(0..=60));
            });
            ui.label(format!(
                "After {} cycles: {:.3e} copies",
                self.cycles,
                pcr_yield(self.initial_copies, self.cycles)
            ));
        });
    }
}

fn validate_input<F>(text: &str, normalize: F) -> InputStatus
where
    F: Fn(&str) -> labbench::Result<usize>,
{
    if text.trim().is_empty() {
        return InputStatus::Empty;
    }
    match parse_sequence_input(text).and_then(|input| {
        let length = normalize(&input.sequence)?;
        Ok((input.name, length))
    }) {
        Ok((name, length)) => InputStatus::Valid { name, length },
        Err(e) => InputStatus::Invalid(e.to_string()),
    }
}

/// Primer table row; GC% and Tm are coloured against the standard windows
fn primer_row(ui: &mut egui::Ui, label: &str, candidate: &PrimerCandidate) {
    let standard = PrimerConstraints::default();
    ui.label(label);
    ui.label(
        egui::RichText::new(&candidate.sequence)
            .monospace()
            .color(egui::Color32::from_rgb(100, 180, 255)),
    );
    ui.label(format!("{}", candidate.start + 1));
    ui.colored_label(
        validity_color(standard.gc_in_range(candidate.gc_percent)),
        format!("{:.2}", candidate.gc_percent),
    );
    ui.colored_label(
        validity_color(standard.tm_in_range(candidate.tm)),
        format!("{:.2}", candidate.tm),
    );
    ui.end_row();
}

fn validity_color(valid: bool) -> egui::Color32 {
    if valid {
        VALID_COLOR
    } else {
        INVALID_COLOR
    }
}

fn default_reagents() -> Vec<ReagentSpec> {
    vec![
        ReagentSpec::new("Buffer", 10.0, 1.0),
        ReagentSpec::new("MgCl2", 25.0, 1.5),
        ReagentSpec::new("dNTPs", 10.0, 0.2),
        ReagentSpec::new("Forward primer", 10.0, 0.4),
        ReagentSpec::new("Reverse primer", 10.0, 0.4),
        ReagentSpec::new("Taq polymerase", 5.0, 0.05),
    ]
}

const EXAMPLE_TEMPLATE: &str = r#">Template
ATGCGTACGTTAGCCTAGGCAATTCGGATCCGTAAGCTTGACTGAATTCCGGAGCTCGTACGATCGATCG
"#;

const EXAMPLE_PROTEIN: &str = r#">Albumin fragment
MKWVTFISLLFLFSSAYSRGVFRRDAHKSEVAHRFKDLGEENFKALVLIAFAQYLQQCPF
"#;
