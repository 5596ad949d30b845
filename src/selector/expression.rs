use crate::StrError;

/// Defines the maximum nesting of parentheses and `not` operators
pub const MAX_SELECTION_DEPTH: usize = 256;

/// Defines a comparison operator of a coordinate predicate
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Compare {
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl Compare {
    /// Applies the operator
    pub fn holds(&self, left: f64, right: f64) -> bool {
        match self {
            Compare::Less => left < right,
            Compare::LessEqual => left <= right,
            Compare::Greater => left > right,
            Compare::GreaterEqual => left >= right,
        }
    }
}

/// Holds the syntax tree of a selection expression
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Faces carrying a group name
    Group(String),

    /// Faces with a color (integer attribute)
    Color(i32),

    /// All faces (`all[]`)
    All,

    /// Faces whose center lies in `[xmin, ymin, zmin, xmax, ymax, zmax]`
    InBox([f64; 6]),

    /// Faces whose center coordinate `axis` (0, 1, 2) compares with a value
    Plane { axis: usize, compare: Compare, value: f64 },

    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Parses a selection expression
    ///
    /// Precedence is `not` > `and` > `or`; parentheses group sub-expressions.
    pub fn parse(expression: &str) -> Result<Self, StrError> {
        let tokens = tokenize(expression)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let expr = parser.parse_or()?;
        if parser.pos != parser.tokens.len() {
            return Err("unexpected token after the end of the selection criteria");
        }
        Ok(expr)
    }

    /// Collects the group names and colors referenced by the expression, in order of appearance
    ///
    /// Colors are returned as their decimal text. Duplicates are skipped.
    pub fn fragments(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_fragments(&mut out);
        out
    }

    fn collect_fragments(&self, out: &mut Vec<String>) {
        let fragment = match self {
            Expr::Group(name) => name.clone(),
            Expr::Color(color) => color.to_string(),
            Expr::Not(a) => return a.collect_fragments(out),
            Expr::And(a, b) | Expr::Or(a, b) => {
                a.collect_fragments(out);
                return b.collect_fragments(out);
            }
            _ => return,
        };
        if !out.contains(&fragment) {
            out.push(fragment);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Word(String),
    Number(String),
    Open,
    Close,
    OpenBracket,
    CloseBracket,
    Comma,
    Cmp(Compare),
}

/// Splits an expression into tokens
fn tokenize(expression: &str) -> Result<Vec<Token>, StrError> {
    let chars: Vec<char> = expression.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        let single = match c {
            '(' => Some(Token::Open),
            ')' => Some(Token::Close),
            '[' => Some(Token::OpenBracket),
            ']' => Some(Token::CloseBracket),
            ',' => Some(Token::Comma),
            _ => None,
        };
        if let Some(token) = single {
            tokens.push(token);
            i += 1;
            continue;
        }
        if c == '<' || c == '>' {
            let equal = i + 1 < chars.len() && chars[i + 1] == '=';
            let compare = match (c, equal) {
                ('<', false) => Compare::Less,
                ('<', true) => Compare::LessEqual,
                ('>', false) => Compare::Greater,
                _ => Compare::GreaterEqual,
            };
            tokens.push(Token::Cmp(compare));
            i += if equal { 2 } else { 1 };
            continue;
        }
        if c == '=' {
            return Err("the '=' character must follow '<' or '>'");
        }
        let start = i;
        while i < chars.len() && !chars[i].is_whitespace() && !"()[],<>=".contains(chars[i]) {
            i += 1;
        }
        let word: String = chars[start..i].iter().collect();
        if is_number(&word) {
            tokens.push(Token::Number(word));
        } else {
            tokens.push(Token::Word(word));
        }
    }
    Ok(tokens)
}

/// Indicates a plain decimal number: optional sign, digits, optional fraction
///
/// Words such as `1e5`, `inf`, or `nan` are group names.
fn is_number(word: &str) -> bool {
    let unsigned = word.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(word);
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    let n_digits = int.len() + frac.map_or(0, |f| f.len());
    n_digits > 0 && digits(int) && frac.map_or(true, digits)
}

/// Implements a recursive-descent parser over the tokens
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_word(&self, word: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w == word)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, token: Token, message: StrError) -> Result<(), StrError> {
        if self.next() == Some(token) {
            Ok(())
        } else {
            Err(message)
        }
    }

    fn number(&mut self) -> Result<f64, StrError> {
        match self.next() {
            Some(Token::Number(text)) => text.parse().map_err(|_| "cannot parse real number"),
            _ => Err("a number is expected"),
        }
    }

    /// Enters a nested level (parenthesis or `not`)
    fn enter(&mut self) -> Result<(), StrError> {
        self.depth += 1;
        if self.depth > MAX_SELECTION_DEPTH {
            return Err("selection criteria nested too deeply");
        }
        Ok(())
    }

    fn parse_or(&mut self) -> Result<Expr, StrError> {
        let mut left = self.parse_and()?;
        while self.peek_word("or") {
            self.pos += 1;
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, StrError> {
        let mut left = self.parse_not()?;
        while self.peek_word("and") {
            self.pos += 1;
            let right = self.parse_not()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, StrError> {
        if self.peek_word("not") {
            self.pos += 1;
            self.enter()?;
            let inner = self.parse_not()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, StrError> {
        let token = self.next().ok_or("selection criteria ended unexpectedly")?;
        match token {
            Token::Open => {
                self.enter()?;
                let inner = self.parse_or()?;
                self.expect(Token::Close, "missing closing parenthesis")?;
                self.depth -= 1;
                Ok(inner)
            }
            Token::Number(text) => {
                let color = text.parse().map_err(|_| "a color must be an integer number")?;
                Ok(Expr::Color(color))
            }
            Token::Word(word) => self.parse_word(word),
            _ => Err("unexpected token in the selection criteria"),
        }
    }

    fn parse_word(&mut self, word: String) -> Result<Expr, StrError> {
        let next = self.peek().cloned();
        match (word.as_str(), next) {
            ("or" | "and", _) => Err("operator without left operand"),
            ("all", Some(Token::OpenBracket)) => {
                self.pos += 1;
                self.expect(Token::CloseBracket, "all[] takes no arguments")?;
                Ok(Expr::All)
            }
            ("box", Some(Token::OpenBracket)) => {
                self.pos += 1;
                let mut values = [0.0; 6];
                for (i, value) in values.iter_mut().enumerate() {
                    if i > 0 {
                        self.expect(Token::Comma, "box[] requires six comma-separated numbers")?;
                    }
                    *value = self.number()?;
                }
                self.expect(Token::CloseBracket, "box[] requires six comma-separated numbers")?;
                Ok(Expr::InBox(values))
            }
            ("x" | "y" | "z", Some(Token::Cmp(compare))) => {
                self.pos += 1;
                let axis = match word.as_str() {
                    "x" => 0,
                    "y" => 1,
                    _ => 2,
                };
                let value = self.number()?;
                Ok(Expr::Plane { axis, compare, value })
            }
            _ => Ok(Expr::Group(word)),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
