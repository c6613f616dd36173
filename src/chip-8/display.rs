pub const FRAME_BUFFER_PIXEL_WIDTH: usize = 64;
pub const FRAME_BUFFER_PIXEL_HEIGHT: usize = 32;
const FRAME_BUFFER_SIZE: usize = FRAME_BUFFER_PIXEL_WIDTH * FRAME_BUFFER_PIXEL_HEIGHT;

/// The 64x32 monochrome framebuffer.
///
/// Pixels are stored row-major. Sprites are XORed on with wraparound at both edges and the
/// only other write is [`Framebuffer::cls`]. The dirty flag is raised by either write and
/// lowered by whoever renders the buffer.
#[derive(Clone)]
pub struct Framebuffer {
    pixels: [bool; FRAME_BUFFER_SIZE],
    dirty: bool,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self {
            pixels: [false; FRAME_BUFFER_SIZE],
            dirty: true,
        }
    }
}

impl Framebuffer {
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Whether the pixel at `(x, y)` is on. `None` outside of the 64x32 screen.
    pub fn pixel(&self, x: usize, y: usize) -> Option<bool> {
        if x >= FRAME_BUFFER_PIXEL_WIDTH || y >= FRAME_BUFFER_PIXEL_HEIGHT {
            return None;
        }

        self.pixels.get(Self::index(x, y)).copied()
    }

    /// Row-major view of every pixel, `true` meaning on.
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// Map pixels to 0RGB values for buffer based backends.
    pub fn rgba(&self, on: u32, off: u32) -> Vec<u32> {
        self.pixels
            .iter()
            .map(|&pixel| if pixel { on } else { off })
            .collect()
    }

    pub fn cls(&mut self) {
        self.pixels = [false; FRAME_BUFFER_SIZE];
        self.dirty = true;
    }

    /// XOR `sprite` onto the buffer with its top left corner at `(x, y)`, both taken modulo the
    /// screen size. Returns whether any pixel that was on got turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        self.dirty = true;
        let x = x as usize % FRAME_BUFFER_PIXEL_WIDTH;
        let y = y as usize % FRAME_BUFFER_PIXEL_HEIGHT;

        sprite
            .iter()
            .enumerate()
            .fold(false, |did_collide, (y_offset, row)| {
                let y_norm = (y + y_offset) % FRAME_BUFFER_PIXEL_HEIGHT;
                let inner_collide = (0..8_usize).fold(false, |did_collide_inner, x_bit| {
                    if (row << x_bit) & 0x80 == 0 {
                        return did_collide_inner;
                    }

                    let x_norm = (x + x_bit) % FRAME_BUFFER_PIXEL_WIDTH;
                    let buffer_index = Self::index(x_norm, y_norm);
                    let previous = self.pixels[buffer_index];
                    self.pixels[buffer_index] = !previous;

                    did_collide_inner || previous
                });

                did_collide || inner_collide
            })
    }

    fn index(x: usize, y: usize) -> usize {
        assert!(
            x < FRAME_BUFFER_PIXEL_WIDTH && y < FRAME_BUFFER_PIXEL_HEIGHT,
            "Invalid pixel ({}, {})",
            x,
            y
        );

        y * FRAME_BUFFER_PIXEL_WIDTH + x
    }
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.pixels.chunks(FRAME_BUFFER_PIXEL_WIDTH) {
            let line: String = row.iter().map(|&p| if p { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }

        Ok(())
    }
}
