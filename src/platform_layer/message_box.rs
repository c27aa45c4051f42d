/*
 * The vocabulary of modal message boxes, shared by every host backend: the button
 * sets and icons that can be requested, and the outcome reported back when the
 * user dismisses the dialog. Selector names follow the native Win32 constants
 * (`"RETRYCANCEL"`, `"ICONERROR"`, ...), and each value knows its native style flag
 * or result code so the Win32 backend can forward them to `MessageBoxW` unchanged.
 */

use super::error::PlatformError;
use std::fmt;
use std::str::FromStr;

/// The button combinations a message box can present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageBoxButtons {
    Ok,
    OkCancel,
    AbortRetryIgnore,
    YesNoCancel,
    YesNo,
    RetryCancel,
    CancelTryContinue,
    OkHelp,
}

impl MessageBoxButtons {
    pub const ALL: [MessageBoxButtons; 8] = [
        MessageBoxButtons::Ok,
        MessageBoxButtons::OkCancel,
        MessageBoxButtons::AbortRetryIgnore,
        MessageBoxButtons::YesNoCancel,
        MessageBoxButtons::YesNo,
        MessageBoxButtons::RetryCancel,
        MessageBoxButtons::CancelTryContinue,
        MessageBoxButtons::OkHelp,
    ];

    pub fn selector(self) -> &'static str {
        match self {
            MessageBoxButtons::Ok => "OK",
            MessageBoxButtons::OkCancel => "OKCANCEL",
            MessageBoxButtons::AbortRetryIgnore => "ABORTRETRYIGNORE",
            MessageBoxButtons::YesNoCancel => "YESNOCANCEL",
            MessageBoxButtons::YesNo => "YESNO",
            MessageBoxButtons::RetryCancel => "RETRYCANCEL",
            MessageBoxButtons::CancelTryContinue => "CANCELTRYCONTINUE",
            MessageBoxButtons::OkHelp => "OKHELP",
        }
    }

    // MB_OK, MB_OKCANCEL, ... ; OKHELP is MB_OK | MB_HELP.
    pub fn style_flags(self) -> u32 {
        match self {
            MessageBoxButtons::Ok => 0x0,
            MessageBoxButtons::OkCancel => 0x1,
            MessageBoxButtons::AbortRetryIgnore => 0x2,
            MessageBoxButtons::YesNoCancel => 0x3,
            MessageBoxButtons::YesNo => 0x4,
            MessageBoxButtons::RetryCancel => 0x5,
            MessageBoxButtons::CancelTryContinue => 0x6,
            MessageBoxButtons::OkHelp => 0x4000,
        }
    }

    /*
     * The outcomes the user can produce with this button set, in display order.
     * The Help button of OKHELP does not close the box, so OK is its only outcome.
     */
    pub fn choices(self) -> &'static [DialogOutcome] {
        use DialogOutcome::*;
        match self {
            MessageBoxButtons::Ok | MessageBoxButtons::OkHelp => &[Ok],
            MessageBoxButtons::OkCancel => &[Ok, Cancel],
            MessageBoxButtons::AbortRetryIgnore => &[Abort, Retry, Ignore],
            MessageBoxButtons::YesNoCancel => &[Yes, No, Cancel],
            MessageBoxButtons::YesNo => &[Yes, No],
            MessageBoxButtons::RetryCancel => &[Retry, Cancel],
            MessageBoxButtons::CancelTryContinue => &[Cancel, TryAgain, Continue],
        }
    }
}

impl FromStr for MessageBoxButtons {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageBoxButtons::ALL
            .into_iter()
            .find(|buttons| buttons.selector() == s)
            .ok_or_else(|| PlatformError::InvalidParameter("button".to_string()))
    }
}

impl fmt::Display for MessageBoxButtons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

/*
 * The icon shown in a message box. Stop, Error and Hand render identically, as do
 * Exclamation and Warning, and Information and Asterisk; they are kept apart so
 * callers can use whichever name reads best.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageBoxIcon {
    None,
    Stop,
    Error,
    Hand,
    Question,
    Exclamation,
    Warning,
    Information,
    Asterisk,
}

impl MessageBoxIcon {
    pub const ALL: [MessageBoxIcon; 9] = [
        MessageBoxIcon::None,
        MessageBoxIcon::Stop,
        MessageBoxIcon::Error,
        MessageBoxIcon::Hand,
        MessageBoxIcon::Question,
        MessageBoxIcon::Exclamation,
        MessageBoxIcon::Warning,
        MessageBoxIcon::Information,
        MessageBoxIcon::Asterisk,
    ];

    pub fn selector(self) -> &'static str {
        match self {
            MessageBoxIcon::None => "NOICON",
            MessageBoxIcon::Stop => "ICONSTOP",
            MessageBoxIcon::Error => "ICONERROR",
            MessageBoxIcon::Hand => "ICONHAND",
            MessageBoxIcon::Question => "ICONQUESTION",
            MessageBoxIcon::Exclamation => "ICONEXCLAMATION",
            MessageBoxIcon::Warning => "ICONWARNING",
            MessageBoxIcon::Information => "ICONINFORMATION",
            MessageBoxIcon::Asterisk => "ICONASTERISK",
        }
    }

    pub fn style_flags(self) -> u32 {
        match self {
            MessageBoxIcon::None => 0x00,
            MessageBoxIcon::Stop | MessageBoxIcon::Error | MessageBoxIcon::Hand => 0x10,
            MessageBoxIcon::Question => 0x20,
            MessageBoxIcon::Exclamation | MessageBoxIcon::Warning => 0x30,
            MessageBoxIcon::Information | MessageBoxIcon::Asterisk => 0x40,
        }
    }

    // Short tag used by text-mode hosts in place of the graphic.
    pub fn caption_tag(self) -> Option<&'static str> {
        match self.style_flags() {
            0x10 => Some("error"),
            0x20 => Some("question"),
            0x30 => Some("warning"),
            0x40 => Some("info"),
            _ => None,
        }
    }
}

impl FromStr for MessageBoxIcon {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageBoxIcon::ALL
            .into_iter()
            .find(|icon| icon.selector() == s)
            .ok_or_else(|| PlatformError::InvalidParameter("icon".to_string()))
    }
}

impl fmt::Display for MessageBoxIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

/// The button the user pressed to dismiss a message box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogOutcome {
    Ok,
    Cancel,
    Abort,
    Retry,
    Ignore,
    Yes,
    No,
    TryAgain,
    Continue,
}

impl DialogOutcome {
    pub const ALL: [DialogOutcome; 9] = [
        DialogOutcome::Ok,
        DialogOutcome::Cancel,
        DialogOutcome::Abort,
        DialogOutcome::Retry,
        DialogOutcome::Ignore,
        DialogOutcome::Yes,
        DialogOutcome::No,
        DialogOutcome::TryAgain,
        DialogOutcome::Continue,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DialogOutcome::Ok => "OK",
            DialogOutcome::Cancel => "CANCEL",
            DialogOutcome::Abort => "ABORT",
            DialogOutcome::Retry => "RETRY",
            DialogOutcome::Ignore => "IGNORE",
            DialogOutcome::Yes => "YES",
            DialogOutcome::No => "NO",
            DialogOutcome::TryAgain => "TRYAGAIN",
            DialogOutcome::Continue => "CONTINUE",
        }
    }

    // IDOK .. IDNO are 1..7; IDTRYAGAIN and IDCONTINUE are 10 and 11.
    pub fn native_id(self) -> i32 {
        match self {
            DialogOutcome::Ok => 1,
            DialogOutcome::Cancel => 2,
            DialogOutcome::Abort => 3,
            DialogOutcome::Retry => 4,
            DialogOutcome::Ignore => 5,
            DialogOutcome::Yes => 6,
            DialogOutcome::No => 7,
            DialogOutcome::TryAgain => 10,
            DialogOutcome::Continue => 11,
        }
    }

    pub fn from_native_id(id: i32) -> Option<Self> {
        DialogOutcome::ALL
            .into_iter()
            .find(|outcome| outcome.native_id() == id)
    }
}

// Parses an outcome name case-insensitively ("retry", "TRYAGAIN").
impl FromStr for DialogOutcome {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DialogOutcome::ALL
            .into_iter()
            .find(|outcome| outcome.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PlatformError::InvalidParameter("outcome".to_string()))
    }
}

impl fmt::Display for DialogOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/*
 * A fully specified message box. `from_selectors` validates selector names before
 * anything is displayed, failing with `InvalidParameter` for an unknown button set
 * or icon.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBoxRequest {
    pub title: String,
    pub text: String,
    pub buttons: MessageBoxButtons,
    pub icon: MessageBoxIcon,
}

impl MessageBoxRequest {
    pub fn from_selectors(
        title: &str,
        text: &str,
        buttons: &str,
        icon: &str,
    ) -> Result<Self, PlatformError> {
        Ok(MessageBoxRequest {
            title: title.to_string(),
            text: text.to_string(),
            buttons: buttons.parse()?,
            icon: icon.parse()?,
        })
    }

    // The combined `uType` value for MessageBoxW.
    pub fn style_flags(&self) -> u32 {
        self.buttons.style_flags() | self.icon.style_flags()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_selectors_parse_and_map_to_flags() {
        let expected = [
            ("OK", 0x0),
            ("OKCANCEL", 0x1),
            ("ABORTRETRYIGNORE", 0x2),
            ("YESNOCANCEL", 0x3),
            ("YESNO", 0x4),
            ("RETRYCANCEL", 0x5),
            ("CANCELTRYCONTINUE", 0x6),
            ("OKHELP", 0x4000),
        ];
        for (selector, flags) in expected {
            let buttons: MessageBoxButtons = selector.parse().unwrap();
            assert_eq!(buttons.style_flags(), flags, "flags for {selector}");
            assert_eq!(buttons.to_string(), selector);
        }
    }

    #[test]
    fn test_icon_aliases_share_flags() {
        let expected = [
            ("NOICON", 0x00),
            ("ICONSTOP", 0x10),
            ("ICONERROR", 0x10),
            ("ICONHAND", 0x10),
            ("ICONQUESTION", 0x20),
            ("ICONEXCLAMATION", 0x30),
            ("ICONWARNING", 0x30),
            ("ICONINFORMATION", 0x40),
            ("ICONASTERISK", 0x40),
        ];
        for (selector, flags) in expected {
            let icon: MessageBoxIcon = selector.parse().unwrap();
            assert_eq!(icon.style_flags(), flags, "flags for {selector}");
        }
    }

    #[test]
    fn test_unknown_selectors_are_invalid_parameters() {
        match "RETRYLATER".parse::<MessageBoxButtons>() {
            Err(PlatformError::InvalidParameter(name)) => assert_eq!(name, "button"),
            other => panic!("Expected invalid button parameter, got {other:?}"),
        }
        match "ICONSMILE".parse::<MessageBoxIcon>() {
            Err(PlatformError::InvalidParameter(name)) => assert_eq!(name, "icon"),
            other => panic!("Expected invalid icon parameter, got {other:?}"),
        }
        // Selectors are matched exactly, as the native constant names.
        assert!("retrycancel".parse::<MessageBoxButtons>().is_err());
    }

    #[test]
    fn test_request_from_selectors_validates_before_display() {
        let request =
            MessageBoxRequest::from_selectors("P4 Search", "boom", "RETRYCANCEL", "ICONERROR")
                .unwrap();
        assert_eq!(request.buttons, MessageBoxButtons::RetryCancel);
        assert_eq!(request.icon, MessageBoxIcon::Error);
        assert_eq!(request.style_flags(), 0x15);

        assert!(MessageBoxRequest::from_selectors("t", "x", "OK", "ICONNOPE").is_err());
        assert!(MessageBoxRequest::from_selectors("t", "x", "NOPE", "ICONERROR").is_err());
    }

    #[test]
    fn test_outcome_native_ids() {
        let expected = [
            (1, DialogOutcome::Ok),
            (2, DialogOutcome::Cancel),
            (3, DialogOutcome::Abort),
            (4, DialogOutcome::Retry),
            (5, DialogOutcome::Ignore),
            (6, DialogOutcome::Yes),
            (7, DialogOutcome::No),
            (10, DialogOutcome::TryAgain),
            (11, DialogOutcome::Continue),
        ];
        for (id, outcome) in expected {
            assert_eq!(DialogOutcome::from_native_id(id), Some(outcome));
            assert_eq!(outcome.native_id(), id);
        }
        assert_eq!(DialogOutcome::from_native_id(0), None);
        assert_eq!(DialogOutcome::from_native_id(8), None);
    }

    #[test]
    fn test_outcome_names_parse_case_insensitively() {
        assert_eq!("retry".parse::<DialogOutcome>().unwrap(), DialogOutcome::Retry);
        assert_eq!(" TryAgain ".parse::<DialogOutcome>().unwrap(), DialogOutcome::TryAgain);
        assert!("maybe".parse::<DialogOutcome>().is_err());
    }

    #[test]
    fn test_choices_cover_each_button_set() {
        assert_eq!(
            MessageBoxButtons::RetryCancel.choices(),
            &[DialogOutcome::Retry, DialogOutcome::Cancel]
        );
        assert_eq!(MessageBoxButtons::OkHelp.choices(), &[DialogOutcome::Ok]);
        for buttons in MessageBoxButtons::ALL {
            assert!(!buttons.choices().is_empty());
        }
    }
}
