use crate::core::services::{ServiceError, ServiceResult};
use crate::core::{BookManager, IncomeOutcome};
use crate::domain::UserId;
use crate::pairing::{PairingInvite, PairingService};
use crate::parser::IncomeParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Shared CLI runtime state.
///
/// Owns the book manager together with the parsing and pairing collaborators
/// and the active identity.
pub struct CliState {
    pub mode: CliMode,
    pub manager: BookManager,
    parser: Box<dyn IncomeParser>,
    pairing: Box<dyn PairingService>,
    pub current_user: UserId,
    pub running: bool,
}

impl CliState {
    pub fn new(
        mode: CliMode,
        manager: BookManager,
        parser: Box<dyn IncomeParser>,
        pairing: Box<dyn PairingService>,
    ) -> Self {
        Self {
            mode,
            manager,
            parser,
            pairing,
            current_user: UserId::Wife,
            running: true,
        }
    }

    pub fn prompt(&self) -> String {
        let name = &self.manager.profiles().get(self.current_user).name;
        format!("{name}@duet> ")
    }

    /// Routes free text through the parser into the book.
    pub fn record_income_text(&mut self, text: &str) -> ServiceResult<Option<IncomeOutcome>> {
        self.manager
            .record_income_text(self.parser.as_ref(), text, self.current_user)
    }

    pub fn pair_create(&mut self) -> ServiceResult<PairingInvite> {
        let invite = self.pairing.create_family();
        self.manager
            .apply_pairing(&invite.family_id, &invite.code, self.current_user)?;
        Ok(invite)
    }

    pub fn pair_join(&mut self, code: &str) -> ServiceResult<String> {
        let family_id = self
            .pairing
            .join_family(code)
            .map_err(|err| ServiceError::Validation(err.to_string()))?;
        self.manager
            .apply_pairing(&family_id, code.trim(), self.current_user)?;
        Ok(family_id)
    }
}
