//! Tokenizer for query expressions.

use super::QueryError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    True,
    False,
    Null,
    And,
    Or,
    Not,
    In,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Minus,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("column `{}`", name),
            Token::Int(i) => i.to_string(),
            Token::Float(f) => f.to_string(),
            Token::Str(s) => format!("{:?}", s),
            Token::True => "True".to_string(),
            Token::False => "False".to_string(),
            Token::Null => "None".to_string(),
            Token::And => "and".to_string(),
            Token::Or => "or".to_string(),
            Token::Not => "not".to_string(),
            Token::In => "in".to_string(),
            Token::Eq => "==".to_string(),
            Token::Ne => "!=".to_string(),
            Token::Lt => "<".to_string(),
            Token::Le => "<=".to_string(),
            Token::Gt => ">".to_string(),
            Token::Ge => ">=".to_string(),
            Token::Minus => "-".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::LBracket => "[".to_string(),
            Token::RBracket => "]".to_string(),
            Token::Comma => ",".to_string(),
        }
    }
}

/// Token with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

pub fn tokenize(src: &str) -> Result<Vec<Spanned>, QueryError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        let token = match ch {
            '(' => single(&mut chars, Token::LParen),
            ')' => single(&mut chars, Token::RParen),
            '[' => single(&mut chars, Token::LBracket),
            ']' => single(&mut chars, Token::RBracket),
            ',' => single(&mut chars, Token::Comma),
            '&' => single(&mut chars, Token::And),
            '|' => single(&mut chars, Token::Or),
            '~' => single(&mut chars, Token::Not),
            '-' => single(&mut chars, Token::Minus),
            '=' | '!' | '<' | '>' => {
                chars.next();
                let followed_by_eq = matches!(chars.peek(), Some((_, '=')));
                if followed_by_eq {
                    chars.next();
                }
                match (ch, followed_by_eq) {
                    ('=', true) => Token::Eq,
                    ('!', true) => Token::Ne,
                    ('<', true) => Token::Le,
                    ('>', true) => Token::Ge,
                    ('<', false) => Token::Lt,
                    ('>', false) => Token::Gt,
                    ('=', false) => {
                        return Err(QueryError::new(offset, "single '=' is not a comparison, use '=='"))
                    }
                    _ => return Err(QueryError::new(offset, "unexpected '!'")),
                }
            }
            '"' | '\'' => {
                chars.next();
                Token::Str(read_string(&mut chars, ch, offset)?)
            }
            '`' => {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '`')) => break,
                        Some((_, c)) => name.push(c),
                        None => return Err(QueryError::new(offset, "unterminated `column` reference")),
                    }
                }
                Token::Ident(name)
            }
            c if c.is_ascii_digit() || c == '.' => read_number(&mut chars, offset)?,
            c if c.is_alphabetic() || c == '_' => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                keyword_or_ident(word)
            }
            other => {
                return Err(QueryError::new(
                    offset,
                    format!("unexpected character '{}'", other),
                ))
            }
        };

        tokens.push(Spanned { token, offset });
    }

    Ok(tokens)
}

type Chars<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

fn single(chars: &mut Chars<'_>, token: Token) -> Token {
    chars.next();
    token
}

fn keyword_or_ident(word: String) -> Token {
    match word.as_str() {
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        "in" => Token::In,
        "True" | "true" => Token::True,
        "False" | "false" => Token::False,
        "None" | "null" => Token::Null,
        _ => Token::Ident(word),
    }
}

fn read_string(chars: &mut Chars<'_>, quote: char, start: usize) -> Result<String, QueryError> {
    let mut out = String::new();
    loop {
        match chars.next() {
            Some((_, c)) if c == quote => return Ok(out),
            Some((pos, '\\')) => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, c @ ('\\' | '"' | '\''))) => out.push(c),
                Some((_, c)) => {
                    return Err(QueryError::new(pos, format!("unknown escape '\\{}'", c)))
                }
                None => break,
            },
            Some((_, c)) => out.push(c),
            None => break,
        }
    }
    Err(QueryError::new(start, "unterminated string literal"))
}

fn read_number(chars: &mut Chars<'_>, start: usize) -> Result<Token, QueryError> {
    let mut text = String::new();
    let mut is_float = false;

    while let Some(&(_, c)) = chars.peek() {
        match c {
            '0'..='9' | '_' => {
                if c != '_' {
                    text.push(c);
                }
                chars.next();
            }
            '.' => {
                is_float = true;
                text.push(c);
                chars.next();
            }
            'e' | 'E' => {
                is_float = true;
                text.push(c);
                chars.next();
                if let Some(&(_, sign @ ('+' | '-'))) = chars.peek() {
                    text.push(sign);
                    chars.next();
                }
            }
            _ => break,
        }
    }

    if is_float {
        text.parse::<f64>()
            .map(Token::Float)
            .map_err(|_| QueryError::new(start, format!("invalid number '{}'", text)))
    } else {
        text.parse::<i64>()
            .map(Token::Int)
            .map_err(|_| QueryError::new(start, format!("invalid number '{}'", text)))
    }
}
