//! 源码词法分析
//!
//! 只识别类型声明所需的记号：标识符（含 `\` 限定名）、变量、字面量、`::` 和单字符符号。
//! 注释与空白被丢弃，字符串内容不会被误认为声明。
//! 开始标记 `<?php` / `<?=` 之前和结束标记 `?>` 之后的内联文本不参与分析。

/// 记号
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// 标识符或限定名
    Identifier(String),
    /// `$` 开头的变量
    Variable(String),
    /// 字符串或数字字面量
    Literal,
    /// `::`
    DoubleColon,
    /// 其他符号
    Symbol(char),
}

impl Token {
    /// 是否为忽略大小写匹配的关键字
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Self::Identifier(name) if name.eq_ignore_ascii_case(keyword))
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

/// 词法分析器
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    in_code: bool,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            position: 0,
            in_code: false,
        }
    }

    /// 分析全部记号
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn next_token(&mut self) -> Option<Token> {
        loop {
            if !self.in_code {
                self.skip_inline_text()?;
            }
            let current = self.peek(0)?;
            match current {
                c if c.is_whitespace() => self.position += 1,
                '?' if self.peek(1) == Some('>') => {
                    self.position += 2;
                    self.in_code = false;
                    // 结束标记同时结束语句
                    return Some(Token::Symbol(';'));
                }
                '/' if self.peek(1) == Some('/') => self.skip_line(),
                '#' if self.peek(1) != Some('[') => self.skip_line(),
                '/' if self.peek(1) == Some('*') => self.skip_block_comment(),
                '\'' | '"' | '`' => {
                    self.skip_quoted(current);
                    return Some(Token::Literal);
                }
                '$' if self.peek(1).is_some_and(is_identifier_start) => {
                    self.position += 1;
                    return Some(Token::Variable(self.read_identifier()));
                }
                ':' if self.peek(1) == Some(':') => {
                    self.position += 2;
                    return Some(Token::DoubleColon);
                }
                c if c.is_ascii_digit() => {
                    self.skip_number();
                    return Some(Token::Literal);
                }
                c if is_identifier_start(c) || c == '\\' => {
                    return Some(Token::Identifier(self.read_identifier()));
                }
                c => {
                    self.position += 1;
                    return Some(Token::Symbol(c));
                }
            }
        }
    }

    /// 跳过内联文本直到下一个开始标记，没有开始标记时返回 `None`
    fn skip_inline_text(&mut self) -> Option<()> {
        while self.position < self.chars.len() {
            if self.peek(0) == Some('<') && self.peek(1) == Some('?') {
                if self.peek(2) == Some('=') {
                    self.position += 3;
                    self.in_code = true;
                    return Some(());
                }
                if self.matches_ignore_case(2, "php") {
                    self.position += 5;
                    self.in_code = true;
                    return Some(());
                }
            }
            self.position += 1;
        }
        None
    }

    fn matches_ignore_case(&self, offset: usize, expected: &str) -> bool {
        expected.chars().enumerate().all(|(index, c)| {
            self.peek(offset + index)
                .is_some_and(|found| found.eq_ignore_ascii_case(&c))
        })
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            // `?>` 结束行注释
            if c == '?' && self.peek(1) == Some('>') {
                break;
            }
            self.position += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        self.position += 2;
        while let Some(c) = self.peek(0) {
            if c == '*' && self.peek(1) == Some('/') {
                self.position += 2;
                return;
            }
            self.position += 1;
        }
    }

    fn skip_quoted(&mut self, quote: char) {
        self.position += 1;
        while let Some(c) = self.peek(0) {
            self.position += 1;
            if c == '\\' {
                self.position += 1;
            } else if c == quote {
                return;
            }
        }
    }

    fn skip_number(&mut self) {
        while self
            .peek(0)
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            self.position += 1;
        }
    }

    fn read_identifier(&mut self) -> String {
        let start = self.position;
        while self
            .peek(0)
            .is_some_and(|c| is_identifier_part(c) || c == '\\')
        {
            self.position += 1;
        }
        self.chars[start..self.position].iter().collect()
    }
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_alphabetic() || !c.is_ascii()
}

fn is_identifier_part(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_and_strings_are_ignored() {
        let tokens = Lexer::new(
            r#"<?php
            // class Hidden
            /* interface AlsoHidden */
            # trait Ignored
            $text = "class NotAType";
            class Visible {}
            "#,
        )
        .tokenize();

        let identifiers: Vec<&str> = tokens.iter().filter_map(Token::as_identifier).collect();
        assert_eq!(identifiers, vec!["class", "Visible"]);
    }

    #[test]
    fn test_qualified_names_and_double_colon() {
        let tokens = Lexer::new(r"<?php namespace App\Http; $name = Foo::class;").tokenize();

        assert_eq!(tokens[0], Token::Identifier("namespace".to_string()));
        assert_eq!(tokens[1], Token::Identifier("App\\Http".to_string()));
        assert!(tokens.contains(&Token::DoubleColon));
        assert!(tokens.contains(&Token::Variable("name".to_string())));
    }

    #[test]
    fn test_attribute_syntax_is_not_a_comment() {
        let tokens = Lexer::new("<?php #[ServiceProvider('request')] class Provider {}").tokenize();
        assert!(tokens.iter().any(|token| token.is_keyword("class")));
        assert!(tokens.contains(&Token::Identifier("Provider".to_string())));
    }

    /// 测试结束标记之后的内联文本不被当作代码
    #[test]
    fn test_inline_text_outside_tags() {
        let tokens = Lexer::new(
            "<h1>class Heading</h1>\n<?php $a = 1; ?>\n<p>Don't class Panic</p>\n<?= $b ?>\n<?PHP class Real {}\n",
        )
        .tokenize();

        let identifiers: Vec<&str> = tokens.iter().filter_map(Token::as_identifier).collect();
        assert_eq!(identifiers, vec!["class", "Real"]);
        assert!(tokens.contains(&Token::Variable("b".to_string())));
    }

    #[test]
    fn test_line_comment_ends_at_close_tag() {
        let tokens = Lexer::new("<?php // note ?> class Text <?php class Code {}").tokenize();
        let identifiers: Vec<&str> = tokens.iter().filter_map(Token::as_identifier).collect();
        assert_eq!(identifiers, vec!["class", "Code"]);
    }
}
