//! CLI command parsing and translation into wire messages.

use chalkboard_shared::protocol::{
    BoxShape, CircleShape, CursorPosition, DEFAULT_COLOR, PathShape, Shape, SocketMessage,
    UpdateCursorColorPayload, UpdateCursorPositionPayload, UpdateDisplayNamePayload,
};
use thiserror::Error;

use crate::board::Board;

pub const HELP: &str = "\
Commands:
  circle <x> <y> <r>           draw a circle
  rect <x> <y> <w> <h>         draw a rectangle
  triangle <x> <y> <w> <h>     draw a triangle
  diamond <x> <y> <w> <h>      draw a diamond
  path <x> <y> <svg-d>         draw a free-hand path
  move <id> <x> <y>            move a shape
  remove <id>                  remove a shape
  clear                        clear the canvas
  name <display name>          change your display name
  color <css color>            change your cursor color
  cursor <x> <y>               move your cursor
  shapes                       list shapes
  users                        list users
  help                         show this help";

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("No shape with id '{0}'")]
    ShapeNotFound(String),
}

/// One line typed at the prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Circle { x: f64, y: f64, radius: f64 },
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Triangle { x: f64, y: f64, width: f64, height: f64 },
    Diamond { x: f64, y: f64, width: f64, height: f64 },
    Path { x: f64, y: f64, d: String },
    Move { id: String, x: f64, y: f64 },
    Remove { id: String },
    Clear,
    Name(String),
    Color(String),
    Cursor { x: f64, y: f64 },
    Shapes,
    Users,
    Help,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        match name {
            "circle" => {
                let [x, y, radius] = numbers::<3>(&args, "circle <x> <y> <r>")?;
                Ok(Command::Circle { x, y, radius })
            }
            "rect" => {
                let [x, y, width, height] = numbers::<4>(&args, "rect <x> <y> <w> <h>")?;
                Ok(Command::Rect { x, y, width, height })
            }
            "triangle" => {
                let [x, y, width, height] = numbers::<4>(&args, "triangle <x> <y> <w> <h>")?;
                Ok(Command::Triangle { x, y, width, height })
            }
            "diamond" => {
                let [x, y, width, height] = numbers::<4>(&args, "diamond <x> <y> <w> <h>")?;
                Ok(Command::Diamond { x, y, width, height })
            }
            "path" => {
                const USAGE: &str = "path <x> <y> <svg-d>";
                if args.len() < 3 {
                    return Err(CommandError::Usage(USAGE));
                }
                let [x, y] = numbers::<2>(&args[..2], USAGE)?;
                Ok(Command::Path {
                    x,
                    y,
                    d: args[2..].join(" "),
                })
            }
            "move" => {
                const USAGE: &str = "move <id> <x> <y>";
                let [id, rest @ ..] = args.as_slice() else {
                    return Err(CommandError::Usage(USAGE));
                };
                let [x, y] = numbers::<2>(rest, USAGE)?;
                Ok(Command::Move {
                    id: id.to_string(),
                    x,
                    y,
                })
            }
            "remove" => match args.as_slice() {
                [id] => Ok(Command::Remove { id: id.to_string() }),
                _ => Err(CommandError::Usage("remove <id>")),
            },
            "clear" => Ok(Command::Clear),
            "name" if !args.is_empty() => Ok(Command::Name(args.join(" "))),
            "name" => Err(CommandError::Usage("name <display name>")),
            "color" => match args.as_slice() {
                [color] => Ok(Command::Color(color.to_string())),
                _ => Err(CommandError::Usage("color <css color>")),
            },
            "cursor" => {
                let [x, y] = numbers::<2>(&args, "cursor <x> <y>")?;
                Ok(Command::Cursor { x, y })
            }
            "shapes" => Ok(Command::Shapes),
            "users" => Ok(Command::Users),
            "help" => Ok(Command::Help),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// The message this command sends, or `None` for display-only commands.
    ///
    /// New shapes get a fresh UUID and use `stroke_color` for their outline.
    pub fn to_message(
        &self,
        board: &Board,
        stroke_color: &str,
    ) -> Result<Option<SocketMessage>, CommandError> {
        let new_id = || uuid::Uuid::new_v4().to_string();
        let stroke = stroke_color.to_string();
        let fill = DEFAULT_COLOR.to_string();
        let me = board.local_user_id().to_string();

        let message = match self {
            Command::Circle { x, y, radius } => SocketMessage::AddShape(Shape::Circle(CircleShape {
                id: new_id(),
                x: *x,
                y: *y,
                stroke_color: stroke,
                fill_color: fill,
                radius: *radius,
            })),
            Command::Rect { x, y, width, height } => SocketMessage::AddShape(Shape::Rectangle(
                box_shape(new_id(), *x, *y, *width, *height, stroke, fill),
            )),
            Command::Triangle { x, y, width, height } => SocketMessage::AddShape(Shape::Triangle(
                box_shape(new_id(), *x, *y, *width, *height, stroke, fill),
            )),
            Command::Diamond { x, y, width, height } => SocketMessage::AddShape(Shape::Diamond(
                box_shape(new_id(), *x, *y, *width, *height, stroke, fill),
            )),
            Command::Path { x, y, d } => SocketMessage::AddShape(Shape::Path(PathShape {
                id: new_id(),
                x: *x,
                y: *y,
                stroke_color: stroke,
                fill_color: fill,
                d: d.clone(),
            })),
            Command::Move { id, x, y } => {
                let shape = board
                    .shape(id)
                    .ok_or_else(|| CommandError::ShapeNotFound(id.clone()))?;
                SocketMessage::UpdateShape(shape.moved_to(*x, *y))
            }
            Command::Remove { id } => {
                let shape = board
                    .shape(id)
                    .ok_or_else(|| CommandError::ShapeNotFound(id.clone()))?;
                SocketMessage::RemoveShape(shape.clone())
            }
            Command::Clear => SocketMessage::ClearCanvas,
            Command::Name(display_name) => {
                SocketMessage::UpdateDisplayName(UpdateDisplayNamePayload {
                    id: me,
                    display_name: display_name.clone(),
                })
            }
            Command::Color(cursor_color) => {
                SocketMessage::UpdateCursorColor(UpdateCursorColorPayload {
                    id: me,
                    cursor_color: cursor_color.clone(),
                })
            }
            Command::Cursor { x, y } => {
                SocketMessage::UpdateCursorPosition(UpdateCursorPositionPayload {
                    id: me,
                    cursor_position: CursorPosition::new(*x, *y),
                })
            }
            Command::Shapes | Command::Users | Command::Help => return Ok(None),
        };
        Ok(Some(message))
    }
}

fn numbers<const N: usize>(args: &[&str], usage: &'static str) -> Result<[f64; N], CommandError> {
    if args.len() != N {
        return Err(CommandError::Usage(usage));
    }
    let mut values = [0.0; N];
    for (value, arg) in values.iter_mut().zip(args) {
        *value = arg
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or(CommandError::Usage(usage))?;
    }
    Ok(values)
}

fn box_shape(
    id: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    stroke_color: String,
    fill_color: String,
) -> BoxShape {
    BoxShape {
        id,
        x,
        y,
        stroke_color,
        fill_color,
        width,
        height,
    }
}
