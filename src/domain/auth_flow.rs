//! Session/authentication state machine.
//!
//! `PhoneEntry -> CodeRequested(purpose) -> [register: NameCollection ->]
//! CodeVerification -> Authenticated`. The machine is pure: network calls
//! happen in the use-case layer, which feeds results back in as explicit
//! transitions. `Authenticated` is terminal; downstream components take over.

/// Number of digits in a one-time code. Verification auto-fires the instant
/// the last slot is filled.
pub const CODE_LEN: usize = 6;

/// Minimum significant digits for a phone number to be sent to the server.
const MIN_PHONE_DIGITS: usize = 10;

/// Ticks before the "resend code" action is re-enabled.
pub const DEFAULT_RESEND_COOLDOWN_TICKS: u32 = 60;

/// Server-side discriminator returned by a successful code request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePurpose {
    /// The phone belongs to an existing identity.
    Login,
    /// First contact; a display name must be collected before verification.
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    PhoneEntry,
    NameCollection,
    CodeVerification,
    Authenticated,
}

/// Local, pre-network validation failures. None of these contact the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    PhoneTooShort,
    NameIncomplete,
}

impl ValidationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::PhoneTooShort => {
                "Phone number must contain at least 10 digits."
            }
            ValidationError::NameIncomplete => {
                "Enter both first and last name, separated by a space."
            }
        }
    }
}

/// Normalizes free-form phone input to a canonical `+<digits>` sequence.
///
/// Russian numbers follow the original service rules: a leading `8` on an
/// 11-digit number becomes `7`, and a bare 10-digit number gains the `7`
/// country prefix.
pub fn normalize_phone(raw: &str) -> Result<String, ValidationError> {
    let mut digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < MIN_PHONE_DIGITS {
        return Err(ValidationError::PhoneTooShort);
    }

    if digits.len() == 11 && digits.starts_with('8') {
        digits.replace_range(..1, "7");
    }
    if digits.len() == MIN_PHONE_DIGITS {
        digits.insert(0, '7');
    }

    Ok(format!("+{digits}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFlow {
    stage: AuthStage,
    phone: Option<String>,
    purpose: Option<CodePurpose>,
    pending_name: Option<String>,
    code: String,
    resend_cooldown: u32,
    cooldown_ticks: u32,
}

impl Default for AuthFlow {
    fn default() -> Self {
        Self::new(DEFAULT_RESEND_COOLDOWN_TICKS)
    }
}

impl AuthFlow {
    pub fn new(cooldown_ticks: u32) -> Self {
        Self {
            stage: AuthStage::PhoneEntry,
            phone: None,
            purpose: None,
            pending_name: None,
            code: String::new(),
            resend_cooldown: 0,
            cooldown_ticks,
        }
    }

    pub fn stage(&self) -> AuthStage {
        self.stage
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn pending_name(&self) -> Option<&str> {
        self.pending_name.as_deref()
    }

    pub fn entered_digits(&self) -> &str {
        &self.code
    }

    /// Applies a successful code request. Login continues straight to code
    /// entry; registration collects a display name first. Arms the resend
    /// cooldown either way.
    pub fn code_requested(&mut self, phone: String, purpose: CodePurpose) {
        if self.stage != AuthStage::PhoneEntry {
            return;
        }

        self.phone = Some(phone);
        self.purpose = Some(purpose);
        self.code.clear();
        self.resend_cooldown = self.cooldown_ticks;
        self.stage = match purpose {
            CodePurpose::Login => AuthStage::CodeVerification,
            CodePurpose::Register => AuthStage::NameCollection,
        };
    }

    /// A failed code request (rate limit, transport) leaves the machine in
    /// `PhoneEntry`; nothing to roll back.
    pub fn request_failed(&self) {
        debug_assert_eq!(self.stage, AuthStage::PhoneEntry);
    }

    /// Registration path: stores the display name after local validation.
    pub fn submit_name(&mut self, full_name: &str) -> Result<(), ValidationError> {
        let trimmed = full_name.trim();
        if trimmed.split_whitespace().count() < 2 {
            return Err(ValidationError::NameIncomplete);
        }
        if self.stage != AuthStage::NameCollection {
            return Ok(());
        }

        self.pending_name = Some(trimmed.to_owned());
        self.code.clear();
        self.stage = AuthStage::CodeVerification;
        Ok(())
    }

    /// Collects one code digit. Returns the complete code exactly when the
    /// sixth slot fills; further pushes while full are ignored, so the
    /// auto-submit trigger fires at most once per entry.
    pub fn push_digit(&mut self, digit: char) -> Option<String> {
        if self.stage != AuthStage::CodeVerification
            || !digit.is_ascii_digit()
            || self.code.len() >= CODE_LEN
        {
            return None;
        }

        self.code.push(digit);
        (self.code.len() == CODE_LEN).then(|| self.code.clone())
    }

    pub fn pop_digit(&mut self) {
        self.code.pop();
    }

    /// `InvalidCode`/`ExpiredCode`: the entered digits are cleared; stage,
    /// phone and purpose survive.
    pub fn verification_failed(&mut self) {
        self.code.clear();
    }

    /// Terminal transition. The issued credentials are owned by the caller.
    pub fn authenticated(&mut self) {
        if self.stage == AuthStage::CodeVerification {
            self.stage = AuthStage::Authenticated;
        }
    }

    /// Backward navigation from code entry: login returns to the phone form,
    /// registration to name collection. Digits are cleared, the phone number
    /// is preserved.
    pub fn go_back(&mut self) {
        if self.stage != AuthStage::CodeVerification {
            return;
        }

        self.code.clear();
        self.stage = match self.purpose {
            Some(CodePurpose::Register) => AuthStage::NameCollection,
            _ => AuthStage::PhoneEntry,
        };
    }

    /// Re-arms the cooldown after a user-triggered resend succeeded.
    pub fn resend_granted(&mut self) {
        self.resend_cooldown = self.cooldown_ticks;
    }

    /// One time-unit of the resend cooldown.
    pub fn tick(&mut self) {
        self.resend_cooldown = self.resend_cooldown.saturating_sub(1);
    }

    pub fn can_resend(&self) -> bool {
        self.resend_cooldown == 0
    }

    pub fn cooldown_remaining(&self) -> u32 {
        self.resend_cooldown
    }
}
