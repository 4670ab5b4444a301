// Prompt constants for the Translation module.
// The template is sent byte-for-byte on every call; only the input changes.

/// Header that opens the instruction section of the model's answer.
#[cfg(test)]
pub const INSTRUCTION_HEADER: &str = "**🗣️ Foreman's Instruction (작업 지시서):**";

/// Header that opens the key-point summary section of the model's answer.
#[cfg(test)]
pub const KEY_POINT_HEADER: &str = "**💡 Key Point:**";

/// Label separating the persona template from the user's Korean text.
pub const INPUT_DELIMITER: &str = "\n\nInput: ";

/// Persona template for Chief Hank.
pub const PERSONA_TEMPLATE: &str = r#"Your name is "Chief Hank". You are a veteran 'Production Superintendent' with over 30 years of experience
in manufacturing plants in the Southern US (Georgia, Alabama).

Your Mission:
Translate Korean production plans into 'Southern US English Work Instructions' for local US workers.

Tone & Style:
1. Professional yet warm: Use colloquialisms and politeness typical of the South (e.g., "mighty fine", "reckon").
2. Southern Nuance: Use "Y'all" or "Folks" instead of "Everyone/Guys".
   Use indirect commands like "I need y'all to go ahead and handle this..." instead of blunt "Do this".
   Maintain mutual respect with "Please" or "Thank you".
3. Clarity: Ensure numbers regarding Safety and Quality are crystal clear.
4. Terminology: Use correct manufacturing terms (Assembly, Line stop, Defect, Shift, quota, etc.).

Input: [Korean production plan content]
Output Format MUST be:
---
**🗣️ Foreman's Instruction (작업 지시서):**
[Southern US English translation]

**💡 Key Point:**
[Summary of the most critical point in short English]
---"#;

/// Appends the raw input to the persona template. The input is not trimmed
/// or escaped.
pub fn build_prompt(raw_text: &str) -> String {
    let mut prompt =
        String::with_capacity(PERSONA_TEMPLATE.len() + INPUT_DELIMITER.len() + raw_text.len());
    prompt.push_str(PERSONA_TEMPLATE);
    prompt.push_str(INPUT_DELIMITER);
    prompt.push_str(raw_text);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_starts_with_template_and_ends_with_input() {
        let input = "오늘 2라인 A교대 근무자들은 안전 장구 착용 확인하세요.";
        let prompt = build_prompt(input);
        assert!(prompt.starts_with(PERSONA_TEMPLATE));
        assert!(prompt.ends_with(&format!("Input: {input}")));
    }

    #[test]
    fn test_input_kept_verbatim() {
        let input = "  <b>\"500개\"</b>\n  ";
        let prompt = build_prompt(input);
        assert_eq!(&prompt[PERSONA_TEMPLATE.len() + INPUT_DELIMITER.len()..], input);
    }

    #[test]
    fn test_template_declares_both_sections() {
        assert!(PERSONA_TEMPLATE.contains(INSTRUCTION_HEADER));
        assert!(PERSONA_TEMPLATE.contains(KEY_POINT_HEADER));
    }
}
