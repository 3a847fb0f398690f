//! The program interpreter (§4.4): wires a flat primitive sequence through
//! its inferred dependency DAG and evaluates it against a [`KnowledgeBase`].

pub mod dependency;

use std::str::FromStr;

use crate::error::{Error, Reason, Result};
use crate::interpreter::dependency::Token;
use crate::kb::KnowledgeBase;
use crate::primitives::{self, Primitive, Slot};

/// A program: parallel primitive-name and literal-argument lists (§4.4).
#[derive(Debug, Clone)]
pub struct Program {
    pub primitives: Vec<String>,
    pub args: Vec<Vec<String>>,
}

impl Program {
    pub fn new(primitives: Vec<String>, args: Vec<Vec<String>>) -> Self {
        Program { primitives, args }
    }
}

/// The final answer (§4.4 "Final formatting"): a list of strings when the
/// last memory slot held a list, otherwise a single string.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    List(Vec<String>),
    Scalar(String),
}

impl Answer {
    pub fn into_strings(self) -> Vec<String> {
        match self {
            Answer::List(v) => v,
            Answer::Scalar(s) => vec![s],
        }
    }
}

/// One step of a debug trace (§4.4 "Error isolation"): built for each
/// primitive call when `show_details` is set, and logged via `log::debug!`.
#[derive(Debug, Clone)]
pub struct TraceStep {
    pub primitive: String,
    pub deps: Vec<usize>,
    pub args: Vec<String>,
}

pub struct Interpreter<'kb> {
    kb: &'kb KnowledgeBase,
    show_details: bool,
}

impl<'kb> Interpreter<'kb> {
    pub fn new(kb: &'kb KnowledgeBase) -> Self {
        Interpreter {
            kb,
            show_details: false,
        }
    }

    pub fn with_trace(mut self, show_details: bool) -> Self {
        self.show_details = show_details;
        self
    }

    /// Evaluate `program`, propagating the first error encountered.
    pub fn run(&self, program: &Program) -> Result<Answer> {
        let (tokens, resolved) = Self::resolve_tokens(program)?;
        let deps = dependency::infer(&tokens)?;

        let mut memory: Vec<Slot> = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            let slot = match token {
                Token::Start | Token::Pad => Slot::Placeholder,
                Token::End => break,
                Token::Primitive(_) => {
                    let primitive = resolved[i].expect("resolved primitive at non-sentinel position");
                    let dep_slots: Vec<&Slot> = deps[i].iter().map(|&d| &memory[d]).collect();
                    let literal_args = &program.args[i - 1];
                    let result = primitives::apply(self.kb, primitive, &dep_slots, literal_args)?;
                    if self.show_details {
                        let step = TraceStep {
                            primitive: primitive.as_ref().to_string(),
                            deps: deps[i].clone(),
                            args: literal_args.clone(),
                        };
                        log::debug!("{step:?} -> {result:?}");
                    }
                    result
                }
            };
            memory.push(slot);
        }

        let last = memory
            .pop()
            .ok_or_else(|| Error::simple("program produced no result"))?;
        Ok(Self::format_answer(last))
    }

    /// Evaluate `program`, catching any error and reporting `Ok(None)`
    /// instead of propagating it (§4.4 "Error isolation").
    pub fn run_isolated(&self, program: &Program) -> Option<Answer> {
        self.run(program).ok()
    }

    fn resolve_tokens(program: &Program) -> Result<(Vec<Token>, Vec<Option<Primitive>>)> {
        if program.primitives.len() != program.args.len() {
            return Err(Error::simple("primitive and argument lists must have equal length").into());
        }

        let mut tokens = Vec::with_capacity(program.primitives.len() + 2);
        let mut resolved = Vec::with_capacity(tokens.capacity());
        tokens.push(Token::Start);
        resolved.push(None);

        for name in &program.primitives {
            match name.as_str() {
                "<PAD>" => {
                    tokens.push(Token::Pad);
                    resolved.push(None);
                }
                other => {
                    let primitive = Primitive::from_str(other).map_err(|_| {
                        Error::new(Reason::Expected {
                            who: Some("primitive name".to_string()),
                            expected: "a known primitive".to_string(),
                            found: other.to_string(),
                        })
                    })?;
                    tokens.push(Token::Primitive(primitive));
                    resolved.push(Some(primitive));
                }
            }
        }

        tokens.push(Token::End);
        resolved.push(None);
        Ok((tokens, resolved))
    }

    fn format_answer(slot: Slot) -> Answer {
        match slot {
            // A program whose last step is a retrieval/filter/navigate/set
            // primitive (unusual, but not forbidden) reports its id list.
            Slot::Names(_) | Slot::Values(_) | Slot::Bundle(_) => Answer::List(slot.into_strings()),
            other => Answer::Scalar(other.into_strings().into_iter().next().unwrap_or_default()),
        }
    }
}
