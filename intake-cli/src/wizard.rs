//! Intake wizard state machine
//!
//! Thirteen steps, one patient field each, followed by a terminal result
//! state. Moving forward requires the current step to validate; moving back
//! never does. The wizard holds no I/O of its own: submission goes through a
//! [`PredictionGateway`].

use std::collections::BTreeMap;

use async_trait::async_trait;
use config_engine::AgePolicy;
use domain_schema::{
    describe, Agravante, Baciloscopia, CodedDomain, CulturaEscarro, FormaTuberculose,
    PatientRecord, PredictionResult, RadiografiaTorax, Raca, Sexo, TipoEntrada, Zona,
    REQUIRED_FIELDS,
};
use thiserror::Error;

pub const STEP_COUNT: usize = 13;

/// Step titles, indexed like [`REQUIRED_FIELDS`]
pub const STEP_TITLES: [&str; STEP_COUNT] = [
    "Idade",
    "Sexo",
    "Raça",
    "Zona de Residência",
    "Tipo de Entrada",
    "Radiografia de Tórax",
    "Forma de Tuberculose",
    "Agravante: AIDS",
    "Agravante: Alcoolismo",
    "Agravante: Diabetes",
    "Agravante: Doença Mental",
    "Baciloscopia",
    "Cultura de Escarro",
];

/// Anything that can turn a patient record into a prediction.
///
/// Implementations never fail: transport problems come back as an
/// error-shaped [`PredictionResult`].
#[async_trait]
pub trait PredictionGateway: Send + Sync {
    async fn predict(&self, record: &PatientRecord) -> PredictionResult;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("{message}")]
    Invalid { field: &'static str, message: String },

    #[error("Código inválido para {field}: {code}")]
    UnknownCode { field: &'static str, code: String },

    #[error("A análise só pode ser enviada na última etapa")]
    NotOnFinalStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    /// Zero-based step index
    Step(usize),
    Result,
}

/// Position shown above the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// One-based step number
    pub step: usize,
    pub total: usize,
    pub percent: u8,
}

/// One selectable answer of a categorical step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub code: String,
    pub label: &'static str,
}

/// Answers collected so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientDraft {
    pub idade: Option<u32>,
    pub sexo: Option<Sexo>,
    pub raca: Option<Raca>,
    pub zona: Option<Zona>,
    pub tipo_entrada: Option<TipoEntrada>,
    pub radiografia_torax: Option<RadiografiaTorax>,
    pub forma_tuberculose: Option<FormaTuberculose>,
    pub agravante_aids: Option<Agravante>,
    pub agravante_alcoolismo: Option<Agravante>,
    pub agravante_diabetes: Option<Agravante>,
    pub agravante_doenca_mental: Option<Agravante>,
    pub baciloscopia: Option<Baciloscopia>,
    pub cultura_escarro: Option<CulturaEscarro>,
}

impl PatientDraft {
    /// Complete record, or `None` while any field is unanswered
    pub fn to_record(&self) -> Option<PatientRecord> {
        Some(PatientRecord {
            idade: self.idade?,
            sexo: self.sexo?,
            raca: self.raca?,
            zona: self.zona?,
            tipo_entrada: self.tipo_entrada?,
            radiografia_torax: self.radiografia_torax?,
            forma_tuberculose: self.forma_tuberculose?,
            agravante_aids: self.agravante_aids?,
            agravante_alcoolismo: self.agravante_alcoolismo?,
            agravante_diabetes: self.agravante_diabetes?,
            agravante_doenca_mental: self.agravante_doenca_mental?,
            baciloscopia: self.baciloscopia?,
            cultura_escarro: self.cultura_escarro?,
        })
    }

    fn is_answered(&self, step: usize) -> bool {
        match step {
            0 => self.idade.is_some(),
            1 => self.sexo.is_some(),
            2 => self.raca.is_some(),
            3 => self.zona.is_some(),
            4 => self.tipo_entrada.is_some(),
            5 => self.radiografia_torax.is_some(),
            6 => self.forma_tuberculose.is_some(),
            7 => self.agravante_aids.is_some(),
            8 => self.agravante_alcoolismo.is_some(),
            9 => self.agravante_diabetes.is_some(),
            10 => self.agravante_doenca_mental.is_some(),
            11 => self.baciloscopia.is_some(),
            12 => self.cultura_escarro.is_some(),
            _ => false,
        }
    }

    /// Human-readable answer for a step, `"-"` when unanswered
    fn describe_step(&self, step: usize) -> String {
        match step {
            0 => self
                .idade
                .map_or_else(|| "-".to_string(), |idade| format!("{} anos", idade)),
            1 => describe(self.sexo).to_string(),
            2 => describe(self.raca).to_string(),
            3 => describe(self.zona).to_string(),
            4 => describe(self.tipo_entrada).to_string(),
            5 => describe(self.radiografia_torax).to_string(),
            6 => describe(self.forma_tuberculose).to_string(),
            7 => describe(self.agravante_aids).to_string(),
            8 => describe(self.agravante_alcoolismo).to_string(),
            9 => describe(self.agravante_diabetes).to_string(),
            10 => describe(self.agravante_doenca_mental).to_string(),
            11 => describe(self.baciloscopia).to_string(),
            12 => describe(self.cultura_escarro).to_string(),
            _ => "-".to_string(),
        }
    }
}

fn choices<T: CodedDomain>() -> Vec<Choice> {
    T::all()
        .iter()
        .map(|value| Choice {
            code: value.wire_code(),
            label: value.description(),
        })
        .collect()
}

fn parse<T: CodedDomain>(field: &'static str, code: &str) -> Result<T, WizardError> {
    T::parse_code(code).ok_or_else(|| WizardError::UnknownCode {
        field,
        code: code.to_string(),
    })
}

/// Wire name of the field collected at `step`
pub fn step_field(step: usize) -> Option<&'static str> {
    REQUIRED_FIELDS.get(step).copied()
}

pub fn step_title(step: usize) -> Option<&'static str> {
    STEP_TITLES.get(step).copied()
}

/// Legal answers for a categorical step; empty for the age step
pub fn choices_for(step: usize) -> Vec<Choice> {
    match step {
        1 => choices::<Sexo>(),
        2 => choices::<Raca>(),
        3 => choices::<Zona>(),
        4 => choices::<TipoEntrada>(),
        5 => choices::<RadiografiaTorax>(),
        6 => choices::<FormaTuberculose>(),
        7..=10 => choices::<Agravante>(),
        11 => choices::<Baciloscopia>(),
        12 => choices::<CulturaEscarro>(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone)]
pub struct IntakeWizard {
    state: WizardState,
    draft: PatientDraft,
    errors: BTreeMap<&'static str, String>,
    age_policy: AgePolicy,
    result: Option<PredictionResult>,
}

impl Default for IntakeWizard {
    fn default() -> Self {
        Self::new(AgePolicy::default())
    }
}

impl IntakeWizard {
    pub fn new(age_policy: AgePolicy) -> Self {
        Self {
            state: WizardState::Step(0),
            draft: PatientDraft::default(),
            errors: BTreeMap::new(),
            age_policy,
            result: None,
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn current_step(&self) -> Option<usize> {
        match self.state {
            WizardState::Step(step) => Some(step),
            WizardState::Result => None,
        }
    }

    pub fn draft(&self) -> &PatientDraft {
        &self.draft
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub fn age_policy(&self) -> AgePolicy {
        self.age_policy
    }

    /// Pending validation errors keyed by wire field name
    pub fn errors(&self) -> &BTreeMap<&'static str, String> {
        &self.errors
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn set_idade(&mut self, idade: u32) {
        self.draft.idade = Some(idade);
        self.errors.remove("idade");
    }

    /// Answer a categorical step with a wire code, as picked from
    /// [`choices_for`]
    ///
    /// # Errors
    ///
    /// [`WizardError::UnknownCode`] when the code is outside the step's
    /// domain or the step is not categorical.
    pub fn select(&mut self, step: usize, code: &str) -> Result<(), WizardError> {
        let field = step_field(step).ok_or(WizardError::UnknownCode {
            field: "etapa",
            code: step.to_string(),
        })?;
        let draft = &mut self.draft;
        match step {
            1 => draft.sexo = Some(parse(field, code)?),
            2 => draft.raca = Some(parse(field, code)?),
            3 => draft.zona = Some(parse(field, code)?),
            4 => draft.tipo_entrada = Some(parse(field, code)?),
            5 => draft.radiografia_torax = Some(parse(field, code)?),
            6 => draft.forma_tuberculose = Some(parse(field, code)?),
            7 => draft.agravante_aids = Some(parse(field, code)?),
            8 => draft.agravante_alcoolismo = Some(parse(field, code)?),
            9 => draft.agravante_diabetes = Some(parse(field, code)?),
            10 => draft.agravante_doenca_mental = Some(parse(field, code)?),
            11 => draft.baciloscopia = Some(parse(field, code)?),
            12 => draft.cultura_escarro = Some(parse(field, code)?),
            _ => {
                return Err(WizardError::UnknownCode {
                    field,
                    code: code.to_string(),
                })
            }
        }
        self.errors.remove(field);
        Ok(())
    }

    /// Check one step, recording or clearing its error
    pub fn validate_step(&mut self, step: usize) -> Result<(), WizardError> {
        let (Some(field), Some(title)) = (step_field(step), step_title(step)) else {
            return Err(WizardError::Invalid {
                field: "etapa",
                message: format!("Etapa inexistente: {}", step),
            });
        };

        let problem = if step == 0 {
            match self.draft.idade {
                None => Some("Idade é obrigatória".to_string()),
                Some(idade) if !self.age_policy.accepts(idade) => {
                    Some(self.age_policy.rejection_message())
                }
                Some(_) => None,
            }
        } else if self.draft.is_answered(step) {
            None
        } else {
            Some(format!("Selecione uma opção para {}", title))
        };

        match problem {
            Some(message) => {
                self.errors.insert(field, message.clone());
                Err(WizardError::Invalid { field, message })
            }
            None => {
                self.errors.remove(field);
                Ok(())
            }
        }
    }

    /// Advance one step if the current one validates.
    ///
    /// Returns whether the wizard moved. The last step is left through
    /// [`IntakeWizard::submit`], never through `next`.
    pub fn next(&mut self) -> bool {
        let WizardState::Step(step) = self.state else {
            return false;
        };
        if step + 1 >= STEP_COUNT || self.validate_step(step).is_err() {
            return false;
        }
        self.state = WizardState::Step(step + 1);
        true
    }

    /// Go back one step; from the result, back to the last step
    pub fn previous(&mut self) -> bool {
        match self.state {
            WizardState::Step(0) => false,
            WizardState::Step(step) => {
                self.state = WizardState::Step(step - 1);
                true
            }
            WizardState::Result => {
                self.state = WizardState::Step(STEP_COUNT - 1);
                true
            }
        }
    }

    /// Validate and send the record, then move to the result state whatever
    /// the gateway answers.
    ///
    /// # Errors
    ///
    /// Fails without calling the gateway when not on the last step or when
    /// any step is invalid; the wizard then moves to the first invalid step.
    pub async fn submit(
        &mut self,
        gateway: &dyn PredictionGateway,
    ) -> Result<&PredictionResult, WizardError> {
        if self.state != WizardState::Step(STEP_COUNT - 1) {
            return Err(WizardError::NotOnFinalStep);
        }

        for step in 0..STEP_COUNT {
            if let Err(e) = self.validate_step(step) {
                self.state = WizardState::Step(step);
                return Err(e);
            }
        }

        let record = self.draft.to_record().ok_or(WizardError::NotOnFinalStep)?;
        let result = gateway.predict(&record).await;
        self.state = WizardState::Result;
        Ok(&*self.result.insert(result))
    }

    /// Back to step 0 with everything discarded
    pub fn reset(&mut self) {
        *self = Self::new(self.age_policy);
    }

    pub fn progress(&self) -> Progress {
        let step = match self.state {
            WizardState::Step(step) => step + 1,
            WizardState::Result => STEP_COUNT,
        };
        let percent = (step as f64 / STEP_COUNT as f64 * 100.0).round();
        Progress {
            step,
            total: STEP_COUNT,
            percent: percent.clamp(0.0, 100.0) as u8,
        }
    }

    /// Answered fields as `(title, description)` pairs, in step order
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        STEP_TITLES
            .iter()
            .enumerate()
            .filter(|(step, _)| self.draft.is_answered(*step))
            .map(|(step, title)| (*title, self.draft.describe_step(step)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct StubGateway {
        calls: Mutex<Vec<PatientRecord>>,
        answer: PredictionResult,
    }

    impl StubGateway {
        fn answering(tempo_cura: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                answer: PredictionResult {
                    tempo_cura: tempo_cura.to_string(),
                    probabilidade: 0.0,
                    timestamp: "2024-01-01T00:00:00.000Z".to_string(),
                    status: 200,
                    error: None,
                    entrada_neuronio: None,
                    saida_recognize: None,
                },
            }
        }
    }

    #[async_trait]
    impl PredictionGateway for StubGateway {
        async fn predict(&self, record: &PatientRecord) -> PredictionResult {
            self.calls.lock().unwrap().push(record.clone());
            self.answer.clone()
        }
    }

    fn filled(wizard: &mut IntakeWizard) {
        wizard.set_idade(45);
        assert!(wizard.next());
        for step in 1..STEP_COUNT {
            let code = choices_for(step)[0].code.clone();
            wizard.select(step, &code).unwrap();
            if step + 1 < STEP_COUNT {
                assert!(wizard.next(), "step {}", step);
            }
        }
    }

    #[test]
    fn test_age_bounds_gate_first_step() {
        let mut wizard = IntakeWizard::new(AgePolicy::ZeroTo120);

        assert!(!wizard.next());
        assert_eq!(wizard.error_for("idade"), Some("Idade é obrigatória"));

        wizard.set_idade(0);
        assert!(!wizard.next());
        assert_eq!(wizard.current_step(), Some(0));

        wizard.set_idade(121);
        assert!(!wizard.next());
        assert_eq!(wizard.error_for("idade"), Some("Idade deve estar entre 1 e 120 anos"));

        wizard.set_idade(45);
        assert!(wizard.errors().is_empty());
        assert!(wizard.next());
        assert_eq!(wizard.current_step(), Some(1));
    }

    #[test]
    fn test_narrow_age_policy() {
        let mut wizard = IntakeWizard::new(AgePolicy::OneTo100);
        wizard.set_idade(101);
        assert!(!wizard.next());
        wizard.set_idade(100);
        assert!(wizard.next());
    }

    #[test]
    fn test_categorical_steps_require_an_answer() {
        let mut wizard = IntakeWizard::default();
        wizard.set_idade(30);
        wizard.next();

        assert!(!wizard.next());
        assert_eq!(wizard.error_for("sexo"), Some("Selecione uma opção para Sexo"));

        assert!(wizard.select(1, "5").is_err());
        wizard.select(1, "2").unwrap();
        assert!(wizard.error_for("sexo").is_none());
        assert!(wizard.next());
        assert_eq!(wizard.draft().sexo, Some(Sexo::Feminino));
    }

    #[test]
    fn test_previous_never_validates() {
        let mut wizard = IntakeWizard::default();
        assert!(!wizard.previous());

        wizard.set_idade(30);
        wizard.next();
        assert!(wizard.previous());
        assert_eq!(wizard.current_step(), Some(0));
        assert_eq!(wizard.draft().idade, Some(30));
    }

    #[test]
    fn test_progress() {
        let mut wizard = IntakeWizard::default();
        assert_eq!(
            wizard.progress(),
            Progress { step: 1, total: 13, percent: 8 }
        );
        wizard.set_idade(30);
        wizard.next();
        assert_eq!(wizard.progress().percent, 15);
    }

    #[tokio::test]
    async fn test_submit_moves_to_result() {
        let mut wizard = IntakeWizard::default();
        filled(&mut wizard);
        assert_eq!(wizard.current_step(), Some(12));
        assert!(!wizard.next());
        assert_eq!(wizard.progress().percent, 100);

        let gateway = StubGateway::answering("6 meses");
        let result = wizard.submit(&gateway).await.unwrap();
        assert_eq!(result.tempo_cura, "6 meses");
        assert_eq!(wizard.state(), WizardState::Result);

        let calls = gateway.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].idade, 45);
        assert_eq!(calls[0].sexo, Sexo::Masculino);
    }

    #[tokio::test]
    async fn test_submit_refuses_before_last_step() {
        let mut wizard = IntakeWizard::default();
        let gateway = StubGateway::answering("6 meses");
        assert_eq!(
            wizard.submit(&gateway).await.unwrap_err(),
            WizardError::NotOnFinalStep
        );
        assert!(gateway.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_summary_and_reset() {
        let mut wizard = IntakeWizard::default();
        wizard.set_idade(52);
        wizard.next();
        wizard.select(1, "1").unwrap();
        wizard.next();
        wizard.select(2, "4").unwrap();

        assert_eq!(
            wizard.summary(),
            vec![
                ("Idade", "52 anos".to_string()),
                ("Sexo", "Masculino".to_string()),
                ("Raça", "Parda".to_string()),
            ]
        );

        wizard.reset();
        assert_eq!(wizard.current_step(), Some(0));
        assert!(wizard.summary().is_empty());
        assert_eq!(wizard.draft(), &PatientDraft::default());
    }
}
