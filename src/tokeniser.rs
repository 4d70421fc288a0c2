use std::fmt::Display;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Token {
    LeftParen,
    RightParen,
    Atom(String),
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::Atom(text) => write!(f, "{text}"),
        }
    }
}

/// Push the contents of the character buffer onto the list of tokens as an atom, if there is anything buffered.
/// Cleans up after itself by clearing the character buffer.
fn flush_char_buf(char_buf: &mut String, tokens: &mut Vec<Token>) {
    if !char_buf.is_empty() {
        tokens.push(Token::Atom(std::mem::take(char_buf)));
    }
}

/// Tokenise a program string. Every input has a tokenisation, so this never fails.
pub fn tokenise(program_string: &str) -> Vec<Token> {
    let mut char_buf = String::new();
    let mut tokens = Vec::new();

    for character in program_string.chars() {
        match character {
            '(' => {
                flush_char_buf(&mut char_buf, &mut tokens);
                tokens.push(Token::LeftParen);
            }
            ')' => {
                flush_char_buf(&mut char_buf, &mut tokens);
                tokens.push(Token::RightParen);
            }
            ' ' | '\t' | '\n' | '\r' => flush_char_buf(&mut char_buf, &mut tokens),
            _ => char_buf.push(character),
        }
    }

    flush_char_buf(&mut char_buf, &mut tokens);

    tokens
}
