//! Shows the CPU canvas: one full-window sprite whose texture is refreshed
//! from the pixel buffer every frame.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use super::canvas::{PixelCanvas, BACKGROUND};
use crate::core::system::system_order::PresentSet;

pub struct PresenterPlugin;

impl Plugin for PresenterPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK))
            .add_systems(Startup, setup_presenter)
            .add_systems(Update, upload_canvas.in_set(PresentSet));
    }
}

#[derive(Resource, Debug, Clone)]
pub struct CanvasTexture(pub Handle<Image>);

#[derive(Component)]
pub struct CanvasSprite;

fn extent(width: u32, height: u32) -> Extent3d {
    Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

pub fn canvas_image(width: u32, height: u32) -> Image {
    Image::new_fill(
        extent(width, height),
        TextureDimension::D2,
        &BACKGROUND.0,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    )
}

fn setup_presenter(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    canvas: Option<Res<PixelCanvas>>,
) {
    commands.spawn(Camera2d);
    let Some(canvas) = canvas else {
        warn!("No PixelCanvas resource; nothing to present");
        return;
    };
    let size = canvas.image().dimensions();
    let handle = images.add(canvas_image(size.0, size.1));
    commands.spawn((
        Sprite {
            image: handle.clone(),
            custom_size: Some(Vec2::new(size.0 as f32, size.1 as f32)),
            ..default()
        },
        CanvasSprite,
    ));
    commands.insert_resource(CanvasTexture(handle));
}

/// Copies the canvas into the sprite texture, following its size.
pub fn upload_canvas(
    canvas: Option<Res<PixelCanvas>>,
    texture: Option<Res<CanvasTexture>>,
    mut images: ResMut<Assets<Image>>,
    mut q_sprite: Query<&mut Sprite, With<CanvasSprite>>,
) {
    let (Some(canvas), Some(texture)) = (canvas, texture) else {
        return;
    };
    let Some(image) = images.get_mut(&texture.0) else {
        return;
    };
    let (w, h) = canvas.image().dimensions();
    if image.size() != UVec2::new(w, h) {
        image.resize(extent(w, h));
        for mut sprite in q_sprite.iter_mut() {
            sprite.custom_size = Some(Vec2::new(w as f32, h as f32));
        }
    }
    let raw = canvas.as_raw();
    match image.data.as_mut() {
        Some(data) if data.len() == raw.len() => data.copy_from_slice(raw),
        _ => image.data = Some(raw.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::surface::{DrawSurface, Dot};
    use bevy::color::Srgba;

    fn app_with_canvas(w: u32, h: u32) -> App {
        let mut app = App::new();
        app.insert_resource(Assets::<Image>::default())
            .insert_resource(PixelCanvas::new(w, h))
            .add_systems(Update, upload_canvas);
        let handle = app
            .world_mut()
            .resource_mut::<Assets<Image>>()
            .add(canvas_image(w, h));
        app.world_mut().spawn((
            Sprite {
                image: handle.clone(),
                custom_size: Some(Vec2::new(w as f32, h as f32)),
                ..default()
            },
            CanvasSprite,
        ));
        app.insert_resource(CanvasTexture(handle));
        app
    }

    #[test]
    fn upload_copies_pixels() {
        let mut app = app_with_canvas(8, 8);
        app.world_mut().resource_mut::<PixelCanvas>().fill_dots(
            Srgba::rgb(1.0, 0.0, 0.0),
            &[Dot { center: Vec2::new(4.0, 4.0), radius: 3.0 }],
        );
        app.update();
        let handle = app.world().resource::<CanvasTexture>().0.clone();
        let images = app.world().resource::<Assets<Image>>();
        let data = images.get(&handle).and_then(|i| i.data.clone()).unwrap();
        let i = (4 * 8 + 4) * 4;
        assert_eq!(&data[i..i + 4], &[255, 0, 0, 255]);
    }

    #[test]
    fn upload_follows_canvas_size() {
        let mut app = app_with_canvas(8, 8);
        app.world_mut().resource_mut::<PixelCanvas>().resize(20, 10);
        app.update();
        let handle = app.world().resource::<CanvasTexture>().0.clone();
        let size = app.world().resource::<Assets<Image>>().get(&handle).unwrap().size();
        assert_eq!(size, UVec2::new(20, 10));
        let mut q = app.world_mut().query::<&Sprite>();
        let sprite = q.single(app.world()).unwrap();
        assert_eq!(sprite.custom_size, Some(Vec2::new(20.0, 10.0)));
    }
}
