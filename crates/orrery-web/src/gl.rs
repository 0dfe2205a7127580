//! WebGL2 implementation of the engine's `Renderer` trait.

use std::collections::HashMap;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram,
    WebGlShader, WebGlUniformLocation, WebGlVertexArrayObject,
};
use orrery_engine::renderer::instance::MeshInstance;
use orrery_engine::{DrawStats, FrameData, Renderer, StarPoint};
use crate::geometry::{self, DrawRun, GeometryKey, VERTEX_FLOATS};

const MAX_LIGHTS: usize = 4;
const SPHERE_SEGMENTS: u32 = 32;

const MESH_VS: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec4 a_model0;
layout(location = 3) in vec4 a_model1;
layout(location = 4) in vec4 a_model2;
layout(location = 5) in vec4 a_model3;
layout(location = 6) in vec4 a_color;
layout(location = 7) in vec4 a_params;

uniform mat4 u_view_projection;

out vec3 v_world;
out vec3 v_normal;
out vec4 v_color;
out float v_shading;

void main() {
    mat4 model = mat4(a_model0, a_model1, a_model2, a_model3);
    vec3 local = a_position;
    vec3 normal = a_normal;
    if (a_params.x > 0.5) {
        local = vec3(a_position.xy * mix(a_params.z, a_params.w, a_position.z), 0.0);
    }
    vec4 world = model * vec4(local, 1.0);
    v_world = world.xyz;
    v_normal = normalize(mat3(model) * normal);
    v_color = a_color;
    v_shading = a_params.y;
    gl_Position = u_view_projection * world;
}
"#;

const MESH_FS: &str = r#"#version 300 es
precision highp float;
#define MAX_LIGHTS 4

in vec3 v_world;
in vec3 v_normal;
in vec4 v_color;
in float v_shading;

uniform vec3 u_ambient;
uniform int u_light_count;
uniform vec4 u_light_position[MAX_LIGHTS];
uniform vec4 u_light_color[MAX_LIGHTS];

out vec4 out_color;

void main() {
    if (v_shading < 0.5) {
        out_color = v_color;
        return;
    }
    vec3 n = normalize(v_normal);
    if (!gl_FrontFacing) {
        n = -n;
    }
    vec3 light = u_ambient;
    for (int i = 0; i < MAX_LIGHTS; i++) {
        if (i >= u_light_count) {
            break;
        }
        vec3 to_light = u_light_position[i].xyz - v_world;
        float dist = length(to_light);
        float range = u_light_color[i].w;
        float att = range > 0.0 ? clamp(1.0 - dist / range, 0.0, 1.0) : 1.0;
        float diffuse = max(dot(n, to_light / max(dist, 1e-4)), 0.0);
        light += u_light_color[i].rgb * u_light_position[i].w * diffuse * att;
    }
    out_color = vec4(v_color.rgb * light, v_color.a);
}
"#;

const STAR_VS: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
uniform mat4 u_view_projection;
uniform float u_point_size;
void main() {
    gl_Position = u_view_projection * vec4(a_position, 1.0);
    gl_PointSize = u_point_size;
}
"#;

const STAR_FS: &str = r#"#version 300 es
precision mediump float;
uniform vec3 u_color;
out vec4 out_color;
void main() {
    out_color = vec4(u_color, 1.0);
}
"#;

fn compile(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| JsValue::from_str("unable to create shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        Err(JsValue::from_str(&format!("shader compile failed: {log}")))
    }
}

fn link(gl: &Gl, vs: &str, fs: &str) -> Result<WebGlProgram, JsValue> {
    let vs = compile(gl, Gl::VERTEX_SHADER, vs)?;
    let fs = compile(gl, Gl::FRAGMENT_SHADER, fs)?;
    let program = gl
        .create_program()
        .ok_or_else(|| JsValue::from_str("unable to create program"))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        Err(JsValue::from_str(&format!("program link failed: {log}")))
    }
}

fn upload(gl: &Gl, target: u32, bytes: &[u8], usage: u32) -> Result<WebGlBuffer, JsValue> {
    let buffer = gl
        .create_buffer()
        .ok_or_else(|| JsValue::from_str("unable to create buffer"))?;
    gl.bind_buffer(target, Some(&buffer));
    gl.buffer_data_with_u8_array(target, bytes, usage);
    Ok(buffer)
}

/// Template geometry plus the VAO that binds it.
struct Geometry {
    vao: WebGlVertexArrayObject,
    _vertices: WebGlBuffer,
    _indices: Option<WebGlBuffer>,
    mode: u32,
    count: i32,
}

struct MeshUniforms {
    view_projection: Option<WebGlUniformLocation>,
    ambient: Option<WebGlUniformLocation>,
    light_count: Option<WebGlUniformLocation>,
    light_position: Option<WebGlUniformLocation>,
    light_color: Option<WebGlUniformLocation>,
}

struct StarUniforms {
    view_projection: Option<WebGlUniformLocation>,
    point_size: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
}

pub struct WebGlRenderer {
    gl: Gl,
    canvas: HtmlCanvasElement,
    mesh_program: WebGlProgram,
    mesh_uniforms: MeshUniforms,
    star_program: WebGlProgram,
    star_uniforms: StarUniforms,
    instance_buffer: WebGlBuffer,
    geometries: HashMap<GeometryKey, Geometry>,
    star_vao: WebGlVertexArrayObject,
    star_buffer: WebGlBuffer,
    uploaded_stars: usize,
}

impl WebGlRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let gl: Gl = canvas
            .get_context("webgl2")?
            .ok_or_else(|| JsValue::from_str("WebGL2 is not available"))?
            .dyn_into()?;

        let mesh_program = link(&gl, MESH_VS, MESH_FS)?;
        let mesh_uniforms = MeshUniforms {
            view_projection: gl.get_uniform_location(&mesh_program, "u_view_projection"),
            ambient: gl.get_uniform_location(&mesh_program, "u_ambient"),
            light_count: gl.get_uniform_location(&mesh_program, "u_light_count"),
            light_position: gl.get_uniform_location(&mesh_program, "u_light_position"),
            light_color: gl.get_uniform_location(&mesh_program, "u_light_color"),
        };
        let star_program = link(&gl, STAR_VS, STAR_FS)?;
        let star_uniforms = StarUniforms {
            view_projection: gl.get_uniform_location(&star_program, "u_view_projection"),
            point_size: gl.get_uniform_location(&star_program, "u_point_size"),
            color: gl.get_uniform_location(&star_program, "u_color"),
        };

        let instance_buffer = upload(&gl, Gl::ARRAY_BUFFER, &[], Gl::DYNAMIC_DRAW)?;

        let star_vao = gl
            .create_vertex_array()
            .ok_or_else(|| JsValue::from_str("unable to create vertex array"))?;
        gl.bind_vertex_array(Some(&star_vao));
        let star_buffer = upload(&gl, Gl::ARRAY_BUFFER, &[], Gl::STATIC_DRAW)?;
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 3, Gl::FLOAT, false, (StarPoint::FLOATS * 4) as i32, 0);
        gl.bind_vertex_array(None);

        let mut renderer = Self {
            gl,
            canvas,
            mesh_program,
            mesh_uniforms,
            star_program,
            star_uniforms,
            instance_buffer,
            geometries: HashMap::new(),
            star_vao,
            star_buffer,
            uploaded_stars: 0,
        };
        renderer.geometry(GeometryKey::Sphere)?;

        renderer.gl.enable(Gl::DEPTH_TEST);
        renderer.gl.cull_face(Gl::BACK);
        renderer.gl.blend_func(Gl::SRC_ALPHA, Gl::ONE_MINUS_SRC_ALPHA);
        Ok(renderer)
    }

    /// Template geometry for `key`, built on first use.
    fn geometry(&mut self, key: GeometryKey) -> Result<&Geometry, JsValue> {
        if !self.geometries.contains_key(&key) {
            let built = self.build_geometry(key)?;
            self.geometries.insert(key, built);
        }
        self.geometries
            .get(&key)
            .ok_or_else(|| JsValue::from_str("geometry cache miss"))
    }

    fn build_geometry(&self, key: GeometryKey) -> Result<Geometry, JsValue> {
        let gl = &self.gl;
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| JsValue::from_str("unable to create vertex array"))?;
        gl.bind_vertex_array(Some(&vao));

        let (vertices, indices, mode) = match key {
            GeometryKey::Sphere => {
                let (v, i) = geometry::unit_sphere(SPHERE_SEGMENTS, SPHERE_SEGMENTS);
                (v, Some(i), Gl::TRIANGLES)
            }
            GeometryKey::Ring { segments } => (geometry::ring_strip(segments), None, Gl::TRIANGLE_STRIP),
        };

        let vertex_buffer = upload(gl, Gl::ARRAY_BUFFER, bytemuck::cast_slice(&vertices), Gl::STATIC_DRAW)?;
        let stride = (VERTEX_FLOATS * 4) as i32;
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 3, Gl::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_with_i32(1, 3, Gl::FLOAT, false, stride, 12);

        let (index_buffer, count) = match indices {
            Some(i) => (
                Some(upload(gl, Gl::ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(&i), Gl::STATIC_DRAW)?),
                i.len() as i32,
            ),
            None => (None, (vertices.len() / VERTEX_FLOATS) as i32),
        };

        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&self.instance_buffer));
        for location in 2..=7u32 {
            gl.enable_vertex_attrib_array(location);
            gl.vertex_attrib_divisor(location, 1);
        }
        gl.bind_vertex_array(None);

        Ok(Geometry {
            vao,
            _vertices: vertex_buffer,
            _indices: index_buffer,
            mode,
            count,
        })
    }

    /// Point the per-instance attributes of the bound VAO at `first`.
    fn bind_instances(&self, first: usize) {
        let gl = &self.gl;
        let stride = MeshInstance::STRIDE_BYTES as i32;
        let base = (first * MeshInstance::STRIDE_BYTES) as i32;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&self.instance_buffer));
        // model columns, color, params
        for (slot, location) in (2..=7u32).enumerate() {
            gl.vertex_attrib_pointer_with_i32(location, 4, Gl::FLOAT, false, stride, base + slot as i32 * 16);
        }
    }

    fn draw_stars(&mut self, frame: &FrameData) -> u32 {
        if frame.stars.is_empty() {
            return 0;
        }
        let gl = &self.gl;
        if self.uploaded_stars != frame.stars.len() {
            gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&self.star_buffer));
            gl.buffer_data_with_u8_array(Gl::ARRAY_BUFFER, bytemuck::cast_slice(frame.stars), Gl::STATIC_DRAW);
            self.uploaded_stars = frame.stars.len();
        }
        gl.use_program(Some(&self.star_program));
        let vp: &[f32] = bytemuck::cast_slice(&frame.camera.view_projection);
        gl.uniform_matrix4fv_with_f32_array(self.star_uniforms.view_projection.as_ref(), false, vp);
        gl.uniform1f(self.star_uniforms.point_size.as_ref(), frame.star_size);
        gl.uniform3fv_with_f32_array(self.star_uniforms.color.as_ref(), &frame.star_color);
        gl.bind_vertex_array(Some(&self.star_vao));
        gl.draw_arrays(Gl::POINTS, 0, frame.stars.len() as i32);
        gl.bind_vertex_array(None);
        1
    }

    fn set_mesh_uniforms(&self, frame: &FrameData) {
        let gl = &self.gl;
        let u = &self.mesh_uniforms;
        gl.use_program(Some(&self.mesh_program));
        let vp: &[f32] = bytemuck::cast_slice(&frame.camera.view_projection);
        gl.uniform_matrix4fv_with_f32_array(u.view_projection.as_ref(), false, vp);
        gl.uniform3fv_with_f32_array(u.ambient.as_ref(), &frame.lighting.ambient());

        let mut positions = [0.0f32; MAX_LIGHTS * 4];
        let mut colors = [0.0f32; MAX_LIGHTS * 4];
        let count = frame.lighting.count().min(MAX_LIGHTS);
        for (i, light) in frame.lighting.iter().take(MAX_LIGHTS).enumerate() {
            positions[i * 4..i * 4 + 3].copy_from_slice(&light.position);
            positions[i * 4 + 3] = light.intensity;
            colors[i * 4..i * 4 + 3].copy_from_slice(&light.color);
            colors[i * 4 + 3] = light.range;
        }
        gl.uniform1i(u.light_count.as_ref(), count as i32);
        gl.uniform4fv_with_f32_array(u.light_position.as_ref(), &positions);
        gl.uniform4fv_with_f32_array(u.light_color.as_ref(), &colors);
    }

    fn draw_runs(&mut self, runs: &[DrawRun]) -> u32 {
        let mut calls = 0;
        for run in runs {
            let (vao, mode, count) = match self.geometry(run.geometry) {
                Ok(g) => (g.vao.clone(), g.mode, g.count),
                Err(err) => {
                    error!("renderer: skipping {:?}: {:?}", run.geometry, err);
                    continue;
                }
            };
            let gl = &self.gl;
            if run.double_sided {
                gl.disable(Gl::CULL_FACE);
            } else {
                gl.enable(Gl::CULL_FACE);
            }
            gl.bind_vertex_array(Some(&vao));
            self.bind_instances(run.start);
            match run.geometry {
                GeometryKey::Sphere => {
                    gl.draw_elements_instanced_with_i32(mode, count, Gl::UNSIGNED_SHORT, 0, run.len as i32)
                }
                GeometryKey::Ring { .. } => gl.draw_arrays_instanced(mode, 0, count, run.len as i32),
            }
            calls += 1;
        }
        self.gl.bind_vertex_array(None);
        calls
    }
}

impl Renderer for WebGlRenderer {
    fn backend(&self) -> &'static str {
        "webgl2"
    }

    fn draw(&mut self, frame: &FrameData) -> DrawStats {
        let [r, g, b] = frame.clear_color;
        self.gl.clear_color(r, g, b, 1.0);
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);

        let mut stats = DrawStats {
            draw_calls: self.draw_stars(frame),
            instances: frame.instances.len() as u32,
        };
        if frame.instances.is_empty() {
            return stats;
        }

        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&self.instance_buffer));
        self.gl.buffer_data_with_u8_array(
            Gl::ARRAY_BUFFER,
            bytemuck::cast_slice(frame.instances),
            Gl::DYNAMIC_DRAW,
        );
        self.set_mesh_uniforms(frame);

        let split = (frame.opaque_split as usize).min(frame.instances.len());
        let opaque = geometry::draw_runs(&frame.instances[..split], 0);
        let transparent = geometry::draw_runs(&frame.instances[split..], split);

        stats.draw_calls += self.draw_runs(&opaque);

        if !transparent.is_empty() {
            self.gl.enable(Gl::BLEND);
            self.gl.depth_mask(false);
            stats.draw_calls += self.draw_runs(&transparent);
            self.gl.depth_mask(true);
            self.gl.disable(Gl::BLEND);
        }
        stats
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.gl.viewport(0, 0, width as i32, height as i32);
    }
}
