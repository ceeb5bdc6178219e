use anyhow::{bail, format_err, Context, Error};

/// One line of emulator input, applied during a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Push(i32, Option<&'a str>),
    Pop,
    Reset,
    /// Detach the terminal as default breadcrumb target.
    Detach,
    Attach,
    /// Print the current screen id and title.
    Show,
}

impl<'a> Command<'a> {
    /// Parses `push <id> [title...]`, `pop`, `reset`, `detach`, `attach` or `show`.
    ///
    /// Everything after the id is the title, inner spaces included.
    pub fn parse(line: &'a str) -> Result<Command<'a>, Error> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim_start()),
            None => (line, ""),
        };

        let command = match verb {
            "push" => {
                let (id, title) = match rest.split_once(char::is_whitespace) {
                    Some((id, title)) => (id, Some(title.trim())),
                    None => (rest, None),
                };
                if id.is_empty() {
                    bail!("push needs a screen id");
                }
                let id = id
                    .parse::<i32>()
                    .with_context(|| format!("invalid screen id {:?}", id))?;
                Command::Push(id, title.filter(|t| !t.is_empty()))
            }
            "pop" => Command::Pop,
            "reset" => Command::Reset,
            "detach" => Command::Detach,
            "attach" => Command::Attach,
            "show" => Command::Show,
            _ => return Err(format_err!("unknown command {:?}", verb)),
        };

        Ok(command)
    }

    /// Whether the command can change what the breadcrumb shows.
    pub fn redraws(&self) -> bool {
        !matches!(self, Command::Show | Command::Detach)
    }
}
