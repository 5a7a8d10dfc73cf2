//! Single-line text input used by every form.

use crossterm::event::KeyCode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
  pub value:  String,
  /// Render as bullets (passwords).
  pub masked: bool,
}

impl TextField {
  pub fn new(value: impl Into<String>) -> Self {
    Self { value: value.into(), masked: false }
  }

  pub fn masked() -> Self { Self { value: String::new(), masked: true } }

  /// Apply an editing key. Returns `false` if the key is not an edit.
  pub fn handle(&mut self, code: KeyCode) -> bool {
    match code {
      KeyCode::Char(c) => self.value.push(c),
      KeyCode::Backspace => {
        self.value.pop();
      }
      _ => return false,
    }
    true
  }

  pub fn clear(&mut self) { self.value.clear(); }

  pub fn display(&self) -> String {
    if self.masked {
      "•".repeat(self.value.chars().count())
    } else {
      self.value.clone()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn typing_and_backspace() {
    let mut f = TextField::default();
    for c in "abc".chars() {
      assert!(f.handle(KeyCode::Char(c)));
    }
    assert!(f.handle(KeyCode::Backspace));
    assert!(!f.handle(KeyCode::Enter));
    assert_eq!(f.value, "ab");
  }

  #[test]
  fn masked_fields_hide_their_value() {
    let mut f = TextField::masked();
    f.handle(KeyCode::Char('p'));
    f.handle(KeyCode::Char('w'));
    assert_eq!(f.display(), "••");
    assert_eq!(f.value, "pw");
  }
}
