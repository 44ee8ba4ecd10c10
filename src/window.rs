use crate::{
    error::{ GridError, GridResult },
    timer::Timer,
};

use sdl2::{
    EventPump,
    event::{ Event, WindowEvent },
    keyboard::Keycode,
    video::{ Window, WindowContext },
    render::{ Canvas, TextureCreator, Texture },
    pixels::{ PixelFormatEnum, Color },
    rect::{ Rect, Point },
};

use image::RgbImage;

const MAX_START_SIDE: u32 = 1024;

/// Shows a composed grid, scaled to fit, with a dotted outline per cell.
pub struct PreviewWindow{
    pub canvas: Canvas<Window>,
    pub texture_creator: TextureCreator<WindowContext>,
    pub texture: Option<(Texture, u32, u32)>,
    rows: u32,
    cols: u32,
    imgx: i32,
    imgy: i32,
    imgw: u32,
    imgh: u32,
}

impl PreviewWindow{
    pub fn create(rows: u32, cols: u32, grid_w: u32, grid_h: u32, timer: &Timer)
        -> GridResult<(Self, EventPump)>
    {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let (_, _, winw, winh) = resize_dims(grid_w, grid_h, MAX_START_SIDE, MAX_START_SIDE);
        let window = video_subsystem
            .window("imggrid", winw.max(1), winh.max(1))
            .resizable()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        log::debug!("window: {}ms", timer.elapsed());
        Ok((
            Self{
                canvas,
                texture_creator,
                texture: None,
                rows: rows.max(1),
                cols: cols.max(1),
                imgx: 0,
                imgy: 0,
                imgw: 1,
                imgh: 1,
            },
            event_pump
        ))
    }

    pub fn set_texture(&mut self, grid: &RgbImage) -> GridResult<()>{
        let (imgw, imgh) = grid.dimensions();
        let mut texture = self
            .texture_creator
            .create_texture_streaming(PixelFormatEnum::RGB24, imgw, imgh)
            .map_err(|e| e.to_string())?;
        texture.update(None, grid, 3 * imgw as usize).map_err(|e| e.to_string())?;
        self.texture = Some((texture, imgw, imgh));
        Ok(())
    }

    /// Block until the window is closed or Escape is pressed.
    pub fn run(&mut self, event_pump: &mut EventPump) -> GridResult<()>{
        let (winw, winh) = self.canvas.output_size()?;
        self.redraw(winw, winh)?;
        for event in event_pump.wait_iter(){
            match event{
                Event::Quit { .. }
                | Event::KeyDown { keycode: Some(Keycode::Escape), .. } => {
                    break;
                },
                Event::Window{ win_event: WindowEvent::SizeChanged(winw, winh), .. } => {
                    log::debug!("resized: ({winw}, {winh})");
                    let winw = winw.max(0).unsigned_abs();
                    let winh = winh.max(0).unsigned_abs();
                    self.redraw(winw, winh)?;
                },
                Event::Window{ win_event: WindowEvent::Exposed, .. } => {
                    let (winw, winh) = self.canvas.output_size()?;
                    self.redraw(winw, winh)?;
                },
                _ => {}
            }
        }
        Ok(())
    }

    pub fn redraw(&mut self, winw: u32, winh: u32) -> GridResult<()>{
        self.canvas.set_draw_color(Color::RGB(32, 32, 32));
        self.canvas.clear();
        if let Some((texture, imgw, imgh)) = &self.texture{
            let (x, y, w, h) = resize_dims(*imgw, *imgh, winw, winh);
            self.canvas.copy(texture, None, Some(Rect::new(x, y, w.max(1), h.max(1))))?;
            self.imgx = x;
            self.imgy = y;
            self.imgw = w;
            self.imgh = h;
        } else {
            return Err(GridError::window("redraw with no grid texture set"));
        }
        for row in 0..self.rows{
            for col in 0..self.cols{
                let (px, py, qx, qy) = cell_uv(row, col, self.rows, self.cols);
                self.draw_rect_uv(px, py, qx, qy)?;
            }
        }
        self.canvas.present();
        Ok(())
    }

    fn draw_rect_uv(&mut self, px: f32, py: f32, qx: f32, qy: f32) -> GridResult<()>{
        let dc = self.canvas.draw_color();
        let px = (px * self.imgw as f32 + self.imgx as f32) as i32;
        let py = (py * self.imgh as f32 + self.imgy as f32) as i32;
        let qx = (qx * self.imgw as f32 + self.imgx as f32) as i32 - 1;
        let qy = (qy * self.imgh as f32 + self.imgy as f32) as i32 - 1;
        let draw_point_box = |skip: usize, canvas: &mut Canvas<Window>| -> Result<(), String>{
            let t = (px..qx).skip(skip).step_by(2)
                .map(|x| Point::new(x, py)).collect::<Vec<_>>();
            let b = (px..qx).skip(skip).step_by(2)
                .map(|x| Point::new(x, qy)).collect::<Vec<_>>();
            let l = (py..qy).skip(skip).step_by(2)
                .map(|y| Point::new(px, y)).collect::<Vec<_>>();
            let r = (py..qy).skip(skip).step_by(2)
                .map(|y| Point::new(qx, y)).collect::<Vec<_>>();
            canvas.draw_points(t.as_slice())?;
            canvas.draw_points(b.as_slice())?;
            canvas.draw_points(l.as_slice())?;
            canvas.draw_points(r.as_slice())?;
            Ok(())
        };
        self.canvas.set_draw_color(Color::RGB(255, 255, 255));
        draw_point_box(0, &mut self.canvas)?;
        self.canvas.set_draw_color(Color::RGB(0, 0, 0));
        draw_point_box(1, &mut self.canvas)?;
        self.canvas.set_draw_color(dc);
        Ok(())
    }
}

/// Cell bounds as fractions of the grid, `(px, py, qx, qy)`.
fn cell_uv(row: u32, col: u32, rows: u32, cols: u32) -> (f32, f32, f32, f32){
    let cw = 1.0 / cols as f32;
    let ch = 1.0 / rows as f32;
    (col as f32 * cw, row as f32 * ch, (col + 1) as f32 * cw, (row + 1) as f32 * ch)
}

/// Largest `(x, y, w, h)` with the image's aspect ratio that fits and is
/// centred in the window.
fn resize_dims(imgw: u32, imgh: u32, winw: u32, winh: u32) -> (i32, i32, u32, u32){
    let wfac = winw as f32 / imgw.max(1) as f32;
    let hfac = winh as f32 / imgh.max(1) as f32;
    let fac = wfac.min(hfac);
    let w = (imgw as f32 * fac) as u32;
    let h = (imgh as f32 * fac) as u32;
    let x = if w + 2 < winw { (winw - w) / 2 } else { 0 } as i32;
    let y = if h + 2 < winh { (winh - h) / 2 } else { 0 } as i32;
    (x, y, w, h)
}
