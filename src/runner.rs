use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop};
use crate::keybindings::Action;
use crate::window::{Command, Toplevel};

/// Drive `toplevel` until it stops.
///
/// Events are routed through [`Toplevel::handle_event`]; commands nobody
/// consumed are handed to `on_command`. A frame is drawn whenever the
/// toplevel reports dirty regions. The quit binding stops the run when no
/// popup swallowed it.
pub fn run_toplevel<O, D, F>(
    output: &mut O,
    input: &mut D,
    toplevel: &mut Toplevel,
    poll_interval: Duration,
    mut on_command: F,
) -> io::Result<()>
where
    O: OutputDriver,
    D: InputDriver,
    F: FnMut(Command, &mut Toplevel),
{
    let (width, height) = output.size()?;
    toplevel.resize(width, height);
    toplevel.begin();
    let mut event_loop = EventLoop::new(input, poll_interval);
    event_loop.driver().set_mouse_capture(true)?;

    event_loop.run(|_driver, event| {
        if let Some(evt) = event {
            let handled = toplevel.handle_event(&evt);
            if !handled
                && let Event::Key(key) = &evt
                && toplevel.keybindings().matches(Action::Quit, key)
            {
                toplevel.request_stop();
            }
            for command in toplevel.take_commands() {
                tracing::debug!(source = ?command.source, id = %command.id, "command");
                on_command(command, toplevel);
            }
        }
        if !toplevel.is_running() {
            return Ok(ControlFlow::Quit);
        }
        if !toplevel.take_redraw_regions().is_empty() {
            output.draw(|mut frame| toplevel.render(&mut frame))?;
        }
        Ok(ControlFlow::Continue)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ContextMenu, MenuItem};
    use crate::ui::UiFrame;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<Event>);

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.0.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    struct Headless {
        buffer: Buffer,
        frames: usize,
    }

    impl OutputDriver for Headless {
        fn enter(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn exit(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn size(&self) -> io::Result<(u16, u16)> {
            Ok((self.buffer.area.width, self.buffer.area.height))
        }

        fn draw<F>(&mut self, f: F) -> io::Result<()>
        where
            F: FnOnce(UiFrame<'_>),
        {
            self.frames += 1;
            let area = self.buffer.area;
            f(UiFrame::from_parts(area, &mut self.buffer));
            Ok(())
        }
    }

    fn key(code: KeyCode, mods: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, mods))
    }

    #[test]
    fn commands_reach_callback_and_quit_stops() {
        let mut toplevel = Toplevel::new(1, 1);
        let menu = toplevel.add_context_menu(ContextMenu::at(
            0,
            0,
            vec![MenuItem::new("Hello", "hello")],
        ));
        let mut output = Headless {
            buffer: Buffer::empty(Rect::new(0, 0, 20, 6)),
            frames: 0,
        };
        let mut input = Scripted(VecDeque::from([
            key(KeyCode::F(10), KeyModifiers::SHIFT),
            key(KeyCode::Enter, KeyModifiers::NONE),
            key(KeyCode::Char('q'), KeyModifiers::CONTROL),
        ]));
        let mut seen = Vec::new();
        run_toplevel(
            &mut output,
            &mut input,
            &mut toplevel,
            Duration::from_millis(0),
            |command, _| seen.push(command.id),
        )
        .unwrap();
        assert_eq!(seen, vec!["hello".to_string()]);
        assert!(!toplevel.is_running());
        assert_eq!(toplevel.viewport(), Rect::new(0, 0, 20, 6));
        assert!(toplevel.context_menu(menu).is_some_and(|m| !m.is_visible()));
        assert!(output.frames >= 1);
    }
}
