//! Hand-written Handlebars parser.
//!
//! Parsing runs in two layers. The template layer splits the source into
//! text and `{{...}}` tags and keeps a stack of open blocks. The expression
//! layer ([`ExprParser`]) reads the inside of one tag: helper name, params,
//! hash pairs and block params.

use crate::ast::{
    BlockStatement, CommentStatement, ContentStatement, DecoratorBlock, Expression, Hash,
    HashPair, Literal, LiteralValue, MustacheStatement, PartialBlockStatement, PartialStatement,
    PathExpression, Position, Program, SourceLocation, Statement, SubExpression,
};
use crate::error::ParseError;

/// Outcome of parsing one template.
pub type ParseResult = Result<Program, ParseError>;

/// Parses template source into its [`Program`] root.
///
/// # Errors
///
/// Returns a [`ParseError`] pointing at the first malformed tag, an
/// unmatched close tag, or the opener of a block left unclosed.
pub fn parse(source: &str) -> ParseResult {
    TemplateParser::new(source).run()
}

/// Maps byte offsets to line/column positions.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(src: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(src.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    fn position(&self, src: &str, offset: usize) -> Position {
        let line = match self.starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = self.starts[line];
        let column = src.get(line_start..offset).map_or(0, |s| s.chars().count());
        Position::new(line + 1, column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Block,
    Inverted,
    PartialBlock,
    Decorator,
}

/// A block whose close tag has not been seen yet.
struct OpenBlock {
    kind: BlockKind,
    path: Expression,
    params: Vec<Expression>,
    hash: Hash,
    block_params: Vec<String>,
    close_name: String,
    /// Opened by `{{else if ...}}`; closed implicitly by the parent's close tag.
    chained: bool,
    start: usize,
    program: Vec<Statement>,
    program_start: usize,
    program_end: Option<usize>,
    inverse: Option<(Vec<Statement>, usize)>,
}

impl OpenBlock {
    fn body_mut(&mut self) -> &mut Vec<Statement> {
        match &mut self.inverse {
            Some((body, _)) => body,
            None => &mut self.program,
        }
    }
}

/// Parsed inside of an opening or standalone tag.
struct TagExpr {
    path: Expression,
    params: Vec<Expression>,
    hash: Hash,
    block_params: Vec<String>,
}

struct TemplateParser<'s> {
    src: &'s str,
    lines: LineIndex,
    root: Vec<Statement>,
    stack: Vec<OpenBlock>,
}

impl<'s> TemplateParser<'s> {
    fn new(src: &'s str) -> Self {
        Self {
            src,
            lines: LineIndex::new(src),
            root: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn pos(&self, offset: usize) -> Position {
        self.lines.position(self.src, offset)
    }

    fn loc(&self, start: usize, end: usize) -> SourceLocation {
        SourceLocation::new(self.pos(start), self.pos(end))
    }

    fn error(&self, message: impl Into<String>, offset: usize) -> ParseError {
        let p = self.pos(offset);
        ParseError::new(message, p.line, p.column)
    }

    fn run(mut self) -> ParseResult {
        let src = self.src;
        let bytes = src.as_bytes();
        let mut content_start = 0;
        let mut cursor = 0;

        while let Some(rel) = src[cursor..].find("{{") {
            let open = cursor + rel;

            // `\{{` renders the mustache literally.
            if open > 0 && bytes[open - 1] == b'\\' && !(open > 1 && bytes[open - 2] == b'\\') {
                self.push_content(content_start, open - 1);
                content_start = open;
                cursor = open + 2;
                continue;
            }

            self.push_content(content_start, open);
            let end = self.parse_tag(open)?;
            content_start = end;
            cursor = end;
        }
        self.push_content(content_start, self.src.len());

        if let Some(block) = self.stack.last() {
            return Err(self.error(
                format!("{} doesn't have a matching close tag", block.close_name),
                block.start,
            ));
        }

        Ok(Program {
            body: self.root,
            block_params: Vec::new(),
            loc: SourceLocation::new(Position::new(1, 0), self.lines.position(self.src, self.src.len())),
        })
    }

    fn push_statement(&mut self, statement: Statement) {
        match self.stack.last_mut() {
            Some(block) => block.body_mut().push(statement),
            None => self.root.push(statement),
        }
    }

    fn push_content(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let statement = Statement::Content(ContentStatement {
            value: self.src[start..end].to_string(),
            loc: self.loc(start, end),
        });
        self.push_statement(statement);
    }

    /// Parses the tag starting at `open` and returns the offset after it.
    fn parse_tag(&mut self, open: usize) -> Result<usize, ParseError> {
        let mut inner = open + 2;
        let rest = &self.src[inner..];

        if rest.starts_with("{{") {
            return Err(self.error("Raw blocks are not supported", open));
        }

        if rest.starts_with('~') {
            inner += 1;
        }

        if self.src[inner..].starts_with("!--") {
            return self.parse_comment(open, inner + 3, true);
        }
        if self.src[inner..].starts_with('!') {
            return self.parse_comment(open, inner + 1, false);
        }

        if self.src[inner..].starts_with('{') {
            let body_start = inner + 1;
            let close = self.find_close(body_start, "}}}", open)?;
            let body_end = trim_tilde(self.src, body_start, close);
            let tag = ExprParser::new(self, body_start, body_end).parse_tag()?;
            let end = close + 3;
            self.push_mustache(tag, false, open, end);
            return Ok(end);
        }

        let close = self.find_close(inner, "}}", open)?;
        let end = close + 2;
        let body_end = trim_tilde(self.src, inner, close);
        let src = self.src;
        let body = &src[inner..body_end];

        match body.chars().next() {
            Some('#') => {
                let after = inner + 1;
                if self.src[after..].starts_with('>') {
                    self.open_block(BlockKind::PartialBlock, after + 1, body_end, open, end)?;
                } else if self.src[after..].starts_with('*') {
                    self.open_block(BlockKind::Decorator, after + 1, body_end, open, end)?;
                } else {
                    self.open_block(BlockKind::Block, after, body_end, open, end)?;
                }
            }
            Some('^') => {
                if self.src[inner + 1..body_end].trim().is_empty() {
                    self.handle_else(None, open, end)?;
                } else {
                    self.open_block(BlockKind::Inverted, inner + 1, body_end, open, end)?;
                }
            }
            Some('/') => self.close_block(inner + 1, body_end, open, end)?,
            Some('>') => {
                let tag = ExprParser::new(self, inner + 1, body_end).parse_tag()?;
                let statement = Statement::Partial(PartialStatement {
                    name: tag.path,
                    params: tag.params,
                    hash: tag.hash,
                    loc: self.loc(open, end),
                });
                self.push_statement(statement);
            }
            Some('&') => {
                let tag = ExprParser::new(self, inner + 1, body_end).parse_tag()?;
                self.push_mustache(tag, false, open, end);
            }
            Some('*') => return Err(self.error("Inline decorators are not supported", open)),
            _ => {
                let trimmed = body.trim_start();
                let lead = body.len() - trimmed.len();
                if trimmed.trim_end() == "else" {
                    self.handle_else(None, open, end)?;
                } else if trimmed.starts_with("else")
                    && trimmed[4..].starts_with(char::is_whitespace)
                {
                    let chain_start = inner + lead + 4;
                    self.handle_else(Some((chain_start, body_end)), open, end)?;
                } else {
                    let tag = ExprParser::new(self, inner, body_end).parse_tag()?;
                    self.push_mustache(tag, true, open, end);
                }
            }
        }

        Ok(end)
    }

    fn parse_comment(&mut self, open: usize, body_start: usize, long: bool) -> Result<usize, ParseError> {
        let src = self.src;
        let search = &src[body_start..];
        let terminator = if long {
            search.match_indices("--").find_map(|(i, _)| {
                let after = &search[i + 2..];
                if after.starts_with("}}") {
                    Some((i, 4))
                } else if after.starts_with("~}}") {
                    Some((i, 5))
                } else {
                    None
                }
            })
        } else {
            search.find("}}").map(|i| {
                if i > 0 && search.as_bytes()[i - 1] == b'~' {
                    (i - 1, 3)
                } else {
                    (i, 2)
                }
            })
        };
        let Some((body_len, terminator_len)) = terminator else {
            return Err(self.error("Unterminated comment", open));
        };

        let end = body_start + body_len + terminator_len;
        let statement = Statement::Comment(CommentStatement {
            value: search[..body_len].to_string(),
            loc: self.loc(open, end),
        });
        self.push_statement(statement);
        Ok(end)
    }

    /// Finds the closing delimiter, skipping over quoted strings.
    fn find_close(&self, from: usize, delimiter: &str, open: usize) -> Result<usize, ParseError> {
        let mut quote: Option<char> = None;
        let mut escaped = false;
        for (i, c) in self.src[from..].char_indices() {
            let at = from + i;
            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '"' | '\'' => quote = Some(c),
                _ if self.src[at..].starts_with(delimiter) => return Ok(at),
                _ => {}
            }
        }
        Err(self.error("Unclosed mustache tag", open))
    }

    fn push_mustache(&mut self, tag: TagExpr, escaped: bool, start: usize, end: usize) {
        let statement = Statement::Mustache(MustacheStatement {
            path: tag.path,
            params: tag.params,
            hash: tag.hash,
            escaped,
            loc: self.loc(start, end),
        });
        self.push_statement(statement);
    }

    fn open_block(
        &mut self,
        kind: BlockKind,
        body_start: usize,
        body_end: usize,
        open: usize,
        end: usize,
    ) -> Result<(), ParseError> {
        let tag = ExprParser::new(self, body_start, body_end).parse_tag()?;
        let close_name = match &tag.path {
            Expression::Path(p) => p.original.clone(),
            Expression::Literal(l) => l.original.clone(),
            Expression::SubExpression(_) if kind == BlockKind::PartialBlock => String::new(),
            Expression::SubExpression(_) => {
                return Err(self.error("Block helper name cannot be a sub-expression", open));
            }
        };
        self.stack.push(OpenBlock {
            kind,
            path: tag.path,
            params: tag.params,
            hash: tag.hash,
            block_params: tag.block_params,
            close_name,
            chained: false,
            start: open,
            program: Vec::new(),
            program_start: end,
            program_end: None,
            inverse: None,
        });
        Ok(())
    }

    /// Handles `{{else}}`, `{{^}}` and `{{else if cond}}`.
    fn handle_else(&mut self, chain: Option<(usize, usize)>, open: usize, end: usize) -> Result<(), ParseError> {
        let tag = match chain {
            Some((start, stop)) => Some(ExprParser::new(self, start, stop).parse_tag()?),
            None => None,
        };

        let Some(block) = self.stack.last_mut() else {
            return Err(self.error("Unexpected {{else}} outside of a block", open));
        };
        if block.inverse.is_some() || !matches!(block.kind, BlockKind::Block | BlockKind::Inverted) {
            let close_name = block.close_name.clone();
            return Err(self.error(format!("Unexpected {{{{else}}}} in {close_name}"), open));
        }
        block.program_end = Some(open);

        match tag {
            None => {
                block.inverse = Some((Vec::new(), end));
            }
            Some(tag) => {
                block.inverse = Some((Vec::new(), open));
                let close_name = block.close_name.clone();
                self.stack.push(OpenBlock {
                    kind: BlockKind::Block,
                    path: tag.path,
                    params: tag.params,
                    hash: tag.hash,
                    block_params: tag.block_params,
                    close_name,
                    chained: true,
                    start: open,
                    program: Vec::new(),
                    program_start: end,
                    program_end: None,
                    inverse: None,
                });
            }
        }
        Ok(())
    }

    fn close_block(&mut self, body_start: usize, body_end: usize, open: usize, end: usize) -> Result<(), ParseError> {
        let name = self.src[body_start..body_end].trim().to_string();
        loop {
            let Some(block) = self.stack.pop() else {
                return Err(self.error(format!("Unexpected closing tag {{{{/{name}}}}}"), open));
            };

            if block.chained {
                let statement = self.finish_block(block, open, open);
                if let Some(parent) = self.stack.last_mut() {
                    parent.body_mut().push(statement);
                    continue;
                }
                return Err(self.error("Dangling {{else}} chain", open));
            }

            if !block.close_name.is_empty() && block.close_name != name {
                return Err(self.error(
                    format!("{} doesn't match {}", block.close_name, name),
                    open,
                ));
            }
            let statement = self.finish_block(block, open, end);
            self.push_statement(statement);
            return Ok(());
        }
    }

    fn finish_block(&self, block: OpenBlock, close_start: usize, end: usize) -> Statement {
        let loc = self.loc(block.start, end);
        let program = Program {
            body: block.program,
            block_params: block.block_params,
            loc: self.loc(
                block.program_start,
                block.program_end.unwrap_or(close_start),
            ),
        };
        let inverse = block.inverse.map(|(body, start)| Program {
            body,
            block_params: Vec::new(),
            loc: self.loc(start, close_start),
        });

        match block.kind {
            BlockKind::Block => Statement::Block(BlockStatement {
                path: block.path,
                params: block.params,
                hash: block.hash,
                program: Some(program),
                inverse,
                loc,
            }),
            BlockKind::Inverted => Statement::Block(BlockStatement {
                path: block.path,
                params: block.params,
                hash: block.hash,
                program: inverse,
                inverse: Some(program),
                loc,
            }),
            BlockKind::PartialBlock => Statement::PartialBlock(PartialBlockStatement {
                name: block.path,
                params: block.params,
                hash: block.hash,
                program,
                loc,
            }),
            BlockKind::Decorator => Statement::DecoratorBlock(DecoratorBlock {
                path: block.path,
                params: block.params,
                hash: block.hash,
                program,
                loc,
            }),
        }
    }
}

/// Strips a whitespace-control `~` right before the closing braces.
fn trim_tilde(src: &str, start: usize, close: usize) -> usize {
    if close > start && src.as_bytes()[close - 1] == b'~' {
        close - 1
    } else {
        close
    }
}

fn is_id_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '!' | '"'
                | '#'
                | '%'
                | '&'
                | '\''
                | '('
                | ')'
                | '*'
                | '+'
                | ','
                | '.'
                | '/'
                | ';'
                | '<'
                | '='
                | '>'
                | '@'
                | '['
                | '\\'
                | ']'
                | '^'
                | '`'
                | '{'
                | '|'
                | '}'
                | '~'
        )
}

/// Characters allowed right after a literal keyword or number.
fn is_lookahead(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, '=' | '~' | '}' | ')' | '|' | '/' | '.'),
    }
}

/// Reads the expressions inside one tag.
struct ExprParser<'p, 's> {
    template: &'p TemplateParser<'s>,
    src: &'s str,
    pos: usize,
    end: usize,
}

impl<'p, 's> ExprParser<'p, 's> {
    fn new(template: &'p TemplateParser<'s>, start: usize, end: usize) -> Self {
        Self {
            template,
            src: template.src,
            pos: start,
            end,
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        self.template.error(message, self.pos)
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..self.end]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.end
    }

    fn parse_tag(mut self) -> Result<TagExpr, ParseError> {
        self.skip_ws();
        if self.at_end() {
            return Err(self.error("Expected a helper name or path"));
        }
        let tag = self.parse_call(None)?;
        self.skip_ws();
        if !self.at_end() {
            return Err(self.error(format!("Unexpected `{}` in tag", self.rest().trim())));
        }
        Ok(tag)
    }

    /// Parses `name params* hash? blockParams?` up to `terminator` or the end.
    fn parse_call(&mut self, terminator: Option<char>) -> Result<TagExpr, ParseError> {
        let path = self.parse_expression()?;
        let mut params = Vec::new();
        loop {
            self.skip_ws();
            if self.at_end()
                || self.peek() == terminator
                || self.is_hash_start()
                || self.is_block_params_start()
            {
                break;
            }
            params.push(self.parse_expression()?);
        }

        let hash = self.parse_hash(terminator)?;
        self.skip_ws();
        let block_params = if terminator.is_none() && self.is_block_params_start() {
            self.parse_block_params()?
        } else {
            Vec::new()
        };

        Ok(TagExpr {
            path,
            params,
            hash,
            block_params,
        })
    }

    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let start = self.pos;
        match self.peek() {
            None => Err(self.error("Expected an expression")),
            Some('(') => self.parse_sub_expression(),
            Some(q @ ('"' | '\'')) => self.parse_string(q),
            Some('@') => {
                self.bump();
                self.parse_path(true, start).map(Expression::Path)
            }
            Some(_) => {
                if let Some(literal) = self.try_keyword_or_number(start) {
                    return Ok(Expression::Literal(literal));
                }
                self.parse_path(false, start).map(Expression::Path)
            }
        }
    }

    fn parse_sub_expression(&mut self) -> Result<Expression, ParseError> {
        let start = self.pos;
        self.bump();
        self.skip_ws();
        let call = self.parse_call(Some(')'))?;
        self.skip_ws();
        if self.bump() != Some(')') {
            return Err(self.error("Expected `)` to close sub-expression"));
        }
        Ok(Expression::SubExpression(Box::new(SubExpression {
            path: call.path,
            params: call.params,
            hash: call.hash,
            loc: self.template.loc(start, self.pos),
        })))
    }

    fn parse_string(&mut self, quote: char) -> Result<Expression, ParseError> {
        let start = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.template.error("Unterminated string literal", start)),
                Some('\\') if self.peek() == Some(quote) => {
                    self.bump();
                    value.push(quote);
                }
                Some(c) if c == quote => break,
                Some(c) => value.push(c),
            }
        }
        Ok(Expression::Literal(Literal {
            original: value.clone(),
            value: LiteralValue::String(value),
            loc: self.template.loc(start, self.pos),
        }))
    }

    fn try_keyword_or_number(&mut self, start: usize) -> Option<Literal> {
        let rest = self.rest();
        for (word, value) in [
            ("true", LiteralValue::Boolean(true)),
            ("false", LiteralValue::Boolean(false)),
            ("null", LiteralValue::Null),
            ("undefined", LiteralValue::Undefined),
        ] {
            if rest.starts_with(word) && is_lookahead(rest[word.len()..].chars().next()) {
                self.pos += word.len();
                return Some(Literal {
                    value,
                    original: word.to_string(),
                    loc: self.template.loc(start, self.pos),
                });
            }
        }

        let bytes = rest.as_bytes();
        let mut i = usize::from(bytes.first() == Some(&b'-'));
        let digits_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == digits_start {
            return None;
        }
        if i + 1 < bytes.len() && bytes[i] == b'.' && bytes[i + 1].is_ascii_digit() {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
        }
        let next = rest[i..].chars().next();
        if !is_lookahead(next) || next == Some('.') || next == Some('/') {
            return None;
        }
        let text = &rest[..i];
        let number: f64 = text.parse().ok()?;
        self.pos += i;
        Some(Literal {
            value: LiteralValue::Number(number),
            original: text.to_string(),
            loc: self.template.loc(start, self.pos),
        })
    }

    fn parse_segment(&mut self) -> Result<(String, bool), ParseError> {
        match self.peek() {
            Some('[') => {
                self.bump();
                let Some(close) = self.rest().find(']') else {
                    return Err(self.error("Unterminated `[` path segment"));
                };
                let segment = self.rest()[..close].to_string();
                self.pos += close + 1;
                Ok((segment, true))
            }
            Some('.') if self.peek_at(1) == Some('.') => {
                self.pos += 2;
                Ok(("..".to_string(), false))
            }
            Some('.') => {
                self.pos += 1;
                Ok((".".to_string(), false))
            }
            _ => {
                let len: usize = self
                    .rest()
                    .chars()
                    .take_while(|c| is_id_char(*c))
                    .map(char::len_utf8)
                    .sum();
                if len == 0 {
                    return Err(self.error(format!(
                        "Expected a path, got `{}`",
                        self.rest().chars().next().unwrap_or(' ')
                    )));
                }
                let segment = self.rest()[..len].to_string();
                self.pos += len;
                Ok((segment, false))
            }
        }
    }

    fn parse_path(&mut self, data: bool, start: usize) -> Result<PathExpression, ParseError> {
        let mut segments = Vec::new();
        loop {
            segments.push(self.parse_segment()?);
            let sep = self.peek();
            let next = self.peek_at(1);
            let continues = match (sep, next) {
                (Some('.' | '/'), Some(c)) if is_id_char(c) || c == '[' => true,
                (Some('/'), Some('.')) => true,
                _ => false,
            };
            if !continues {
                break;
            }
            self.bump();
        }

        let original = self.src[start..self.pos].to_string();
        let mut parts = Vec::new();
        let mut depth = 0;
        let mut this = false;
        for (segment, literal) in segments {
            let special = !literal && matches!(segment.as_str(), ".." | "." | "this");
            if special {
                if !parts.is_empty() {
                    return Err(self.template.error(format!("Invalid path: {original}"), start));
                }
                if segment == ".." {
                    depth += 1;
                } else {
                    this = true;
                }
            } else {
                parts.push(segment);
            }
        }

        Ok(PathExpression {
            data,
            depth,
            parts,
            original,
            this,
            loc: self.template.loc(start, self.pos),
        })
    }

    fn is_hash_start(&self) -> bool {
        let rest = self.rest();
        let key_len = if rest.starts_with('[') {
            match rest.find(']') {
                Some(i) => i + 1,
                None => return false,
            }
        } else {
            rest.chars()
                .take_while(|c| is_id_char(*c))
                .map(char::len_utf8)
                .sum()
        };
        key_len > 0 && rest[key_len..].trim_start().starts_with('=')
    }

    fn parse_hash(&mut self, terminator: Option<char>) -> Result<Hash, ParseError> {
        let mut pairs = Vec::new();
        loop {
            self.skip_ws();
            if self.at_end() || self.peek() == terminator || !self.is_hash_start() {
                break;
            }
            let start = self.pos;
            let (key, _) = self.parse_segment()?;
            self.skip_ws();
            self.bump();
            self.skip_ws();
            let value = self.parse_expression()?;
            pairs.push(HashPair {
                key,
                value,
                loc: self.template.loc(start, self.pos),
            });
        }

        let loc = match (pairs.first(), pairs.last()) {
            (Some(first), Some(last)) => SourceLocation::new(first.loc.start, last.loc.end),
            _ => SourceLocation::default(),
        };
        Ok(Hash { pairs, loc })
    }

    fn is_block_params_start(&self) -> bool {
        let rest = self.rest();
        rest.starts_with("as")
            && rest[2..].starts_with(char::is_whitespace)
            && rest[2..].trim_start().starts_with('|')
    }

    fn parse_block_params(&mut self) -> Result<Vec<String>, ParseError> {
        self.pos += 2;
        self.skip_ws();
        self.bump();
        let mut names = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some('|') => {
                    self.bump();
                    return Ok(names);
                }
                Some(c) if is_id_char(c) => {
                    let (name, _) = self.parse_segment()?;
                    names.push(name);
                }
                _ => return Err(self.error("Expected `|` to close block params")),
            }
        }
    }
}
